//! Action/dialogue balance per printed page

use super::ratio;
use crate::query::{is, is_dialogue, not, Query};
use crate::script::TokenKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageBalance {
    pub action_lines: usize,
    pub dialogue_lines: usize,
    pub total_lines: usize,
    /// Source line of the first token on the page
    pub first_line: Option<usize>,
    pub action_time: f64,
    pub dialogue_time: f64,
}

#[derive(Debug, Default)]
pub struct PageBalanceState {
    current_page: usize,
}

pub type PageBalances = Query<usize, PageBalance, PageBalanceState>;

/// Groups by 1-based page number; each page break starts the next page.
/// Pages holding nothing but page breaks produce no record.
pub fn page_balance() -> PageBalances {
    PageBalances::labelled("page_balance", "page_number", PageBalance::default())
        .prepare(|state, _| {
            state.current_page = 1;
            Ok(())
        })
        .enter(is([TokenKind::PageBreak]), |_, ctx| {
            ctx.state.current_page += 1;
            Ok(())
        })
        .enter(not(is([TokenKind::PageBreak])), |token, ctx| {
            let id = ctx.select(ctx.state.current_page);
            ctx.data_mut(id).first_line.get_or_insert(token.line);
            Ok(())
        })
        .enter(
            is([TokenKind::SceneHeading, TokenKind::Action]),
            |token, ctx| {
                let id = ctx.select(ctx.state.current_page);
                let page = ctx.data_mut(id);
                page.action_lines += token.line_count();
                page.total_lines += token.line_count();
                Ok(())
            },
        )
        .enter(is_dialogue(), |token, ctx| {
            let id = ctx.select(ctx.state.current_page);
            let page = ctx.data_mut(id);
            page.dialogue_lines += token.line_count();
            page.total_lines += token.line_count();
            Ok(())
        })
        .exit(|group, _, _| {
            let page = &mut group.data;
            let total = page.total_lines as f64;
            page.action_time = ratio(page.action_lines as f64, total);
            page.dialogue_time = ratio(page.dialogue_lines as f64, total);
            Ok(())
        })
}
