//! Character co-occurrence network
//!
//! Nodes are the most present characters (by number of scenes); an edge
//! joins two of them for every scene they both speak in. Built as two
//! chained queries: one collecting the cast of each scene, and a derived
//! query over those scene records counting unordered pairs.

use super::basics::Basics;
use super::characters::{characters, CharacterStats};
use crate::config::StatsConfig;
use crate::query::{is, to_records, Filter, Group, GroupId, Query, Record, StatsResult};
use crate::script::{Token, TokenKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Top characters speaking in one scene, in cue order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneCast {
    pub characters: Vec<String>,
}

/// Edge between two characters, by their index in
/// [`CharacterNetwork::characters`]. `from < to`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub from: usize,
    pub to: usize,
    /// Scenes shared by both characters
    pub scenes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CharacterNetwork {
    /// Nodes, sorted by name
    pub characters: Vec<Group<String, CharacterStats>>,
    /// Edges keyed by `(from, to)`
    pub links: Vec<Group<(usize, usize), Link>>,
}

/// Nodes and edges of the co-occurrence network as plain records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkReport {
    pub characters: Vec<Record>,
    pub links: Vec<Record>,
}

impl CharacterNetwork {
    pub fn to_records(&self) -> StatsResult<NetworkReport> {
        Ok(NetworkReport {
            characters: to_records(Some("name"), &self.characters)?,
            links: to_records(Some("link_id"), &self.links)?,
        })
    }

    /// Look up the edge between two nodes in either order.
    pub fn link(&self, a: usize, b: usize) -> Option<&Link> {
        let key = (a.min(b), a.max(b));
        self.links.iter().find(|g| g.key == key).map(|g| &g.data)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.characters.iter().position(|g| g.key == name)
    }
}

#[derive(Debug, Default)]
pub struct SceneCastState {
    current: Option<GroupId>,
}

pub type SceneCasts = Query<usize, SceneCast, SceneCastState>;
pub type Links = Query<(usize, usize), Link, (), Group<usize, SceneCast>>;

/// Cast per scene, restricted to `top`. Keyed by heading position; cues
/// before the first heading belong to no scene.
pub fn scene_cast(top: HashMap<String, usize>) -> SceneCasts {
    SceneCasts::labelled("scene_cast", "token", SceneCast::default())
        .enter(is([TokenKind::SceneHeading]), |_, ctx| {
            let id = ctx.select(ctx.position());
            ctx.state.current = Some(id);
            Ok(())
        })
        .enter(is([TokenKind::Character]), move |token, ctx| {
            let Some(id) = ctx.state.current else {
                return Ok(());
            };
            let name = token
                .character_name()
                .ok_or_else(|| ctx.malformed("character cue without a name"))?;
            if !top.contains_key(name) {
                return Ok(());
            }
            let cast = ctx.data_mut(id);
            if !cast.characters.iter().any(|c| c == name) {
                cast.characters.push(name.to_string());
            }
            Ok(())
        })
}

/// Derived query over [`scene_cast`] records counting shared scenes per
/// unordered pair of characters.
pub fn links(index: HashMap<String, usize>) -> Links {
    Links::labelled("links", "link_id", Link::default()).enter(
        Filter::always(),
        move |scene, ctx| {
            let cast = &scene.data.characters;
            for (i, a) in cast.iter().enumerate() {
                for b in &cast[i + 1..] {
                    let (Some(&a), Some(&b)) = (index.get(a), index.get(b)) else {
                        continue;
                    };
                    let (from, to) = (a.min(b), a.max(b));
                    let id = ctx.select((from, to));
                    let link = ctx.data_mut(id);
                    link.from = from;
                    link.to = to;
                    link.scenes += 1;
                }
            }
            Ok(())
        },
    )
}

/// Build the network for the `config.network_size` characters present in
/// the most scenes. Ties at the cut-off go to the alphabetically first name.
pub fn character_network(
    tokens: &[Token],
    config: &StatsConfig,
    basics: &Basics,
) -> StatsResult<CharacterNetwork> {
    let mut top = characters(basics).run(tokens, config)?;
    top.sort_by(|a, b| {
        b.data
            .nof_scenes
            .cmp(&a.data.nof_scenes)
            .then_with(|| a.key.cmp(&b.key))
    });
    top.truncate(config.network_size);
    top.sort_by(|a, b| a.key.cmp(&b.key));

    let index: HashMap<String, usize> = top
        .iter()
        .enumerate()
        .map(|(i, character)| (character.key.clone(), i))
        .collect();

    let scenes = scene_cast(index.clone()).run(tokens, config)?;
    let links = links(index).run(&scenes, config)?;
    debug!(
        characters = top.len(),
        scenes = scenes.len(),
        links = links.len(),
        "character network"
    );

    Ok(CharacterNetwork {
        characters: top,
        links,
    })
}
