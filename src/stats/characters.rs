//! Per-character scene presence and dialogue share

use super::basics::Basics;
use super::ratio;
use crate::query::{is, is_dialogue, GroupId, Query};
use crate::script::TokenKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterStats {
    /// Positions of the scene headings the character speaks in
    pub scenes: Vec<usize>,
    pub nof_scenes: usize,
    /// Cue and dialogue lines
    pub lines: usize,
    /// Share of the document's dialogue time
    pub time: f64,
}

#[derive(Debug, Default)]
pub struct CharactersState {
    current_scene: Option<usize>,
    current_character: Option<GroupId>,
}

pub type Characters = Query<String, CharacterStats, CharactersState>;

/// Groups by speaker name. `basics` supplies the dialogue totals the
/// per-character time share is scaled by.
pub fn characters(basics: &Basics) -> Characters {
    let dialogue_lines = basics.dialogue_lines as f64;
    let dialogue_time = basics.dialogue_time;

    Characters::labelled("characters", "name", CharacterStats::default())
        .enter(is([TokenKind::SceneHeading]), |_, ctx| {
            ctx.state.current_scene = Some(ctx.position());
            Ok(())
        })
        .enter(is([TokenKind::Character]), |token, ctx| {
            let name = token
                .character_name()
                .ok_or_else(|| ctx.malformed("character cue without a name"))?;
            let id = ctx.select(name.to_string());
            let scene = ctx.state.current_scene;
            let character = ctx.data_mut(id);
            if let Some(scene) = scene {
                if !character.scenes.contains(&scene) {
                    character.scenes.push(scene);
                }
            }
            character.nof_scenes = character.scenes.len();
            ctx.state.current_character = Some(id);
            Ok(())
        })
        .enter(is_dialogue(), |token, ctx| {
            if let Some(id) = ctx.state.current_character {
                ctx.data_mut(id).lines += token.line_count();
            }
            Ok(())
        })
        .exit(move |group, _, _| {
            let character = &mut group.data;
            character.time = ratio(character.lines as f64, dialogue_lines) * dialogue_time;
            Ok(())
        })
}
