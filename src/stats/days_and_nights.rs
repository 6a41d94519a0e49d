//! Day/night distribution of scenes
//!
//! Scene headings are counted under DAY, NIGHT, DUSK or DAWN by exclusive
//! counters (first match wins). Headings with none of those labels either
//! inherit the last counted label (`keep_last_scene_time`) or fall into
//! OTHER, which is derived from an independent scene count so the five
//! groups always add up to the number of scene headings.

use crate::query::{has_scene_time, is, Counter, Group, Query};
use crate::script::TokenKind;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DAY: &str = "DAY";
pub const NIGHT: &str = "NIGHT";
pub const DUSK: &str = "DUSK";
pub const DAWN: &str = "DAWN";
pub const OTHER: &str = "OTHER";

/// Recognized labels, in counter order.
pub const TIME_LABELS: [&str; 4] = [DAY, NIGHT, DUSK, DAWN];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeOfDayCount {
    pub value: usize,
}

#[derive(Debug, Default)]
pub struct DaysAndNightsState {
    recognized: usize,
}

pub type DaysAndNights = Query<String, TimeOfDayCount, DaysAndNightsState>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneTotal {
    pub scenes: usize,
}

/// Labelless query counting every scene heading.
pub fn scene_total() -> Query<(), SceneTotal> {
    Query::<(), SceneTotal>::single("scene_total", SceneTotal::default()).count(Counter::new(
        "scenes",
        |total: &mut SceneTotal| &mut total.scenes,
        is([TokenKind::SceneHeading]),
    ))
}

pub fn days_and_nights() -> DaysAndNights {
    let mut query = DaysAndNights::labelled("days_and_nights", "label", TimeOfDayCount::default());
    for label in TIME_LABELS {
        query = query.count(
            Counter::new(
                "value",
                |count: &mut TimeOfDayCount| &mut count.value,
                has_scene_time(label),
            )
            .keyed(label.to_string())
            .exclusive(),
        );
    }

    query
        .enter(is([TokenKind::SceneHeading]), |_, ctx| {
            if ctx.counter_matched() || !ctx.config().keep_last_scene_time {
                return Ok(());
            }
            if let Some(id) = ctx.last_selected() {
                ctx.data_mut(id).value += 1;
            }
            Ok(())
        })
        .exit(|group, state, _| {
            state.recognized += group.data.value;
            Ok(())
        })
        .end(|result, state, env| {
            let total = scene_total()
                .run(env.source(), env.config())?
                .first()
                .map_or(0, |group| group.data.scenes);
            let other = total.saturating_sub(state.recognized);
            debug!(total, recognized = state.recognized, other, "scene times");
            result.push(Group::new(OTHER.to_string(), TimeOfDayCount { value: other }));
            Ok(())
        })
}
