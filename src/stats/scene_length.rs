//! Scene length and time-of-day type per scene

use super::days_and_nights::{DAY, NIGHT};
use crate::query::{any, has_scene_time, is, GroupId, Query};
use crate::script::TokenKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneType {
    Day,
    Night,
    #[default]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneLength {
    pub header: String,
    /// Lines from the heading (inclusive) up to the next heading
    pub length: usize,
    #[serde(rename = "type")]
    pub scene_type: SceneType,
}

#[derive(Debug, Default)]
pub struct SceneLengthState {
    current: Option<GroupId>,
    last_type: Option<SceneType>,
}

pub type SceneLengths = Query<usize, SceneLength, SceneLengthState>;

/// Groups by scene heading position in the token sequence.
pub fn scene_length() -> SceneLengths {
    let day = has_scene_time(DAY);
    let night = has_scene_time(NIGHT);

    SceneLengths::labelled("scene_length", "token", SceneLength::default())
        .enter(is([TokenKind::SceneHeading]), move |token, ctx| {
            let scene_type = if day.matches(token) {
                SceneType::Day
            } else if night.matches(token) {
                SceneType::Night
            } else {
                ctx.state.last_type.unwrap_or(SceneType::Other)
            };
            ctx.state.last_type = ctx.config().keep_last_scene_time.then_some(scene_type);

            let id = ctx.select(ctx.position());
            let scene = ctx.data_mut(id);
            scene.header = token.text.clone();
            scene.scene_type = scene_type;
            ctx.state.current = Some(id);
            Ok(())
        })
        .enter(any(), |token, ctx| {
            if let Some(id) = ctx.state.current {
                ctx.data_mut(id).length += token.line_count();
            }
            Ok(())
        })
}
