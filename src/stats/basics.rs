//! Document-wide totals: scenes, pages, action/dialogue lines and time

use super::ratio;
use crate::config::StatsConfig;
use crate::query::{any, is, is_dialogue, Counter, Group, Query, StatsResult};
use crate::script::{Token, TokenKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Basics {
    pub scenes: usize,
    pub action_lines: usize,
    pub dialogue_lines: usize,
    pub page_breaks: usize,
    /// Lines printed since the last page break
    pub last_page_lines: usize,
    /// Page breaks plus the fraction of the last, partial page
    pub pages: f64,
    pub action_time: f64,
    pub dialogue_time: f64,
}

pub fn basics() -> Query<(), Basics> {
    Query::<(), Basics>::single("basics", Basics::default())
        .count(
            Counter::new(
                "action_lines",
                |b: &mut Basics| &mut b.action_lines,
                is([TokenKind::Action, TokenKind::SceneHeading]),
            )
            .by_lines(),
        )
        .count(
            Counter::new(
                "dialogue_lines",
                |b: &mut Basics| &mut b.dialogue_lines,
                is_dialogue(),
            )
            .by_lines(),
        )
        .count(Counter::new(
            "page_breaks",
            |b: &mut Basics| &mut b.page_breaks,
            is([TokenKind::PageBreak]),
        ))
        .enter(is([TokenKind::SceneHeading]), |_, ctx| {
            let id = ctx.single();
            ctx.data_mut(id).scenes += 1;
            Ok(())
        })
        .enter(any(), |token, ctx| {
            let id = ctx.single();
            let basics = ctx.data_mut(id);
            if token.is(TokenKind::PageBreak) {
                basics.last_page_lines = 0;
            } else {
                basics.last_page_lines += token.line_count();
            }
            Ok(())
        })
        .exit(|group, _, env| {
            let basics = &mut group.data;
            let all = (basics.action_lines + basics.dialogue_lines) as f64;
            basics.pages = basics.page_breaks as f64
                + ratio(
                    basics.last_page_lines as f64,
                    env.config().print.lines_per_page as f64,
                );
            basics.action_time = ratio(basics.action_lines as f64, all) * basics.pages;
            basics.dialogue_time = ratio(basics.dialogue_lines as f64, all) * basics.pages;
            Ok(())
        })
        .end(|result, _, _| {
            if result.is_empty() {
                result.push(Group::new((), Basics::default()));
            }
            Ok(())
        })
}

impl Basics {
    /// Run [`basics`] and unwrap its single record.
    pub fn compute(tokens: &[Token], config: &StatsConfig) -> StatsResult<Basics> {
        Ok(basics()
            .run(tokens, config)?
            .into_iter()
            .next()
            .map(|group| group.data)
            .unwrap_or_default())
    }
}
