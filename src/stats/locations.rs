//! Location frequency and contiguous location breakdown

use super::ratio;
use crate::query::{is, not, GroupId, Query};
use crate::script::TokenKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationCount {
    pub count: usize,
}

/// Scene headings per location, most frequent first.
pub fn locations() -> Query<String, LocationCount> {
    Query::<String, LocationCount>::labelled("locations", "name", LocationCount::default())
        .sort_by("count", |location| location.count as f64)
        .enter(is([TokenKind::SceneHeading]), |token, ctx| {
            let location = token
                .location()
                .ok_or_else(|| ctx.malformed("scene heading without a location"))?;
            let id = ctx.select(location.to_string());
            ctx.data_mut(id).count += 1;
            Ok(())
        })
}

/// One uninterrupted run of scenes at the same location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRun {
    pub location: String,
    pub scenes: usize,
    /// Lines after the headings of the run
    pub lines: usize,
    pub pages: f64,
    /// Line count of each scene in the run
    pub scenes_lines: Vec<usize>,
}

#[derive(Debug, Default)]
pub struct LocationsBreakdownState {
    current: Option<GroupId>,
}

pub type LocationsBreakdown = Query<usize, LocationRun, LocationsBreakdownState>;

/// Groups consecutive scene headings sharing a location; a location that
/// recurs after a different one starts a new record. Keyed by the position
/// of the first heading of each run.
pub fn locations_breakdown() -> LocationsBreakdown {
    LocationsBreakdown::labelled("locations_breakdown", "token", LocationRun::default())
        .enter(is([TokenKind::SceneHeading]), |token, ctx| {
            let location = token
                .location()
                .ok_or_else(|| ctx.malformed("scene heading without a location"))?;
            let current = ctx.state.current;
            let id = match current {
                Some(id) if ctx.group(id).data.location == location => id,
                _ => {
                    let id = ctx.select(ctx.position());
                    ctx.data_mut(id).location = location.to_string();
                    id
                }
            };
            let run = ctx.data_mut(id);
            run.scenes += 1;
            run.scenes_lines.push(0);
            ctx.state.current = Some(id);
            Ok(())
        })
        .enter(not(is([TokenKind::SceneHeading])), |token, ctx| {
            let Some(id) = ctx.state.current else {
                return Ok(());
            };
            let lines = token.line_count();
            let lines_per_page = ctx.config().print.lines_per_page as f64;
            let run = ctx.data_mut(id);
            run.lines += lines;
            run.pages = ratio(run.lines as f64, lines_per_page);
            if let Some(last) = run.scenes_lines.last_mut() {
                *last += lines;
            }
            Ok(())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatsConfig;
    use crate::query::StatsError;
    use crate::script::Token;

    fn script() -> Vec<Token> {
        vec![
            Token::scene_heading(1, "INT. A - DAY"),
            Token::action(2, "One.\nTwo."),
            Token::scene_heading(4, "INT. A - NIGHT"),
            Token::action(5, "Three."),
            Token::scene_heading(6, "EXT. B - DAY"),
            Token::action(7, "Four."),
            Token::scene_heading(8, "INT. A - DAY"),
        ]
    }

    #[test]
    fn counts_sorted_descending() {
        let result = locations().run(&script(), &StatsConfig::default()).unwrap();
        let counts: Vec<_> = result.iter().map(|g| (g.key.as_str(), g.data.count)).collect();
        assert_eq!(counts, vec![("A", 3), ("B", 1)]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let tokens = vec![
            Token::scene_heading(1, "INT. C - DAY"),
            Token::scene_heading(2, "INT. B - DAY"),
            Token::scene_heading(3, "INT. A - DAY"),
        ];
        let result = locations().run(&tokens, &StatsConfig::default()).unwrap();
        let keys: Vec<_> = result.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["C", "B", "A"]);
    }

    #[test]
    fn breakdown_merges_only_contiguous_runs() {
        let config = StatsConfig::default().with_lines_per_page(4);
        let result = locations_breakdown().run(&script(), &config).unwrap();
        let runs: Vec<_> = result
            .iter()
            .map(|g| (g.key, g.data.location.as_str(), g.data.scenes))
            .collect();
        assert_eq!(runs, vec![(0, "A", 2), (4, "B", 1), (6, "A", 1)]);

        assert_eq!(result[0].data.scenes_lines, vec![2, 1]);
        assert_eq!(result[0].data.lines, 3);
        assert!((result[0].data.pages - 0.75).abs() < 1e-9);
        assert_eq!(result[2].data.scenes_lines, vec![0]);
        assert_eq!(result[2].data.pages, 0.0);
    }

    #[test]
    fn tokens_before_first_heading_are_ignored() {
        let mut tokens = vec![Token::action(0, "Prologue.")];
        tokens.extend(script());
        let result = locations_breakdown().run(&tokens, &StatsConfig::default()).unwrap();
        assert_eq!(result[0].data.lines, 3);
    }

    #[test]
    fn heading_without_location_fails() {
        let tokens = vec![Token::action(1, "x"), Token::scene_heading(2, "INT.")];
        for result in [
            locations().run(&tokens, &StatsConfig::default()).map(|_| ()),
            locations_breakdown().run(&tokens, &StatsConfig::default()).map(|_| ()),
        ] {
            assert!(matches!(
                result,
                Err(StatsError::MalformedToken { index: 1, .. })
            ));
        }
    }
}
