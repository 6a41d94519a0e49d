//! Narrative tempo signal
//!
//! Scenes and blocks (maximal runs of action/dialogue tokens) shorter than
//! their average push the signal up, longer ones pull it down. The running
//! value decays by [`TEMPO_DECAY`] once at every block boundary and once per
//! printed line, and one sample is emitted per line.

use super::ratio;
use crate::config::StatsConfig;
use crate::query::{is, not, Predicate, Query, StatsResult};
use crate::script::{Token, TokenKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const TEMPO_DECAY: f64 = 0.9;

/// Scene weight is the number of (non-empty) scenes divided by this.
const SCENE_WEIGHT_DIVISOR: f64 = 10.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Positions of the block's tokens in the source sequence
    pub tokens: Vec<usize>,
    pub lines: usize,
    pub line_tempo_change: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneTempo {
    pub scene_heading: String,
    pub blocks: Vec<Block>,
    pub lines: usize,
    pub avg_lines_per_block: f64,
    pub line_tempo_change: f64,
}

#[derive(Debug, Default)]
pub struct TempoState {
    scene_number: usize,
    block_open: bool,
    total_lines: usize,
}

pub type TempoScenes = Query<usize, SceneTempo, TempoState>;

fn is_block_kind() -> Predicate {
    is([TokenKind::Action, TokenKind::Dialogue])
}

/// Per-scene block structure, keyed by 1-based scene number. Scenes without
/// lines are dropped from the result and from the per-scene average.
pub fn tempo_scenes() -> TempoScenes {
    TempoScenes::labelled("tempo", "scene_number", SceneTempo::default())
        .enter(is([TokenKind::SceneHeading]), |token, ctx| {
            ctx.state.scene_number += 1;
            ctx.state.block_open = false;
            let id = ctx.select(ctx.state.scene_number);
            ctx.data_mut(id).scene_heading = token.text.clone();
            Ok(())
        })
        .enter(is_block_kind(), |token, ctx| {
            if ctx.state.scene_number == 0 {
                return Ok(());
            }
            let id = ctx.select(ctx.state.scene_number);
            let position = ctx.position();
            let lines = token.line_count();
            let open = ctx.state.block_open;

            let scene = ctx.data_mut(id);
            if !open || scene.blocks.is_empty() {
                scene.blocks.push(Block::default());
            }
            if let Some(block) = scene.blocks.last_mut() {
                block.tokens.push(position);
                block.lines += lines;
            }
            scene.lines += lines;

            ctx.state.block_open = true;
            ctx.state.total_lines += lines;
            Ok(())
        })
        .enter(
            not(is_block_kind().or(is([TokenKind::SceneHeading]))),
            |_, ctx| {
                ctx.state.block_open = false;
                Ok(())
            },
        )
        .exit(|group, _, _| {
            let scene = &mut group.data;
            scene.avg_lines_per_block = ratio(scene.lines as f64, scene.blocks.len() as f64);
            for block in scene.blocks.iter_mut() {
                block.line_tempo_change = ratio(
                    scene.avg_lines_per_block - block.lines as f64,
                    block.lines as f64,
                );
            }
            Ok(())
        })
        .end(|result, state, _| {
            result.retain(|scene| scene.data.lines > 0);
            let avg_lines_per_scene = ratio(state.total_lines as f64, result.len() as f64);
            for scene in result.iter_mut() {
                let scene = &mut scene.data;
                scene.line_tempo_change =
                    ratio(avg_lines_per_scene - scene.lines as f64, scene.lines as f64);
            }
            Ok(())
        })
}

/// One line of the tempo signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempoSample {
    pub scene: String,
    pub line: String,
    pub line_no: Option<usize>,
    pub tempo: f64,
}

impl TempoSample {
    /// Empty sample bracketing the signal.
    pub fn boundary() -> Self {
        Self {
            scene: String::new(),
            line: String::new(),
            line_no: None,
            tempo: 0.0,
        }
    }

    pub fn is_boundary(&self) -> bool {
        self.line_no.is_none()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the tempo signal: one sample per line of every non-empty scene,
/// between two boundary samples.
pub fn tempo(tokens: &[Token], config: &StatsConfig) -> StatsResult<Vec<TempoSample>> {
    let scenes = tempo_scenes().run(tokens, config)?;
    let scene_weight = scenes.len() as f64 / SCENE_WEIGHT_DIVISOR;

    let mut samples = vec![TempoSample::boundary()];
    let mut current = 0.0;
    for scene in scenes.iter().map(|group| &group.data) {
        for block in &scene.blocks {
            current *= TEMPO_DECAY;
            let change = scene_weight * scene.line_tempo_change + block.line_tempo_change;
            for token in block.tokens.iter().filter_map(|&position| tokens.get(position)) {
                for line in &token.lines {
                    current *= TEMPO_DECAY;
                    current += change;
                    samples.push(TempoSample {
                        scene: scene.scene_heading.clone(),
                        line: line.text.clone(),
                        line_no: Some(line.number),
                        tempo: round2(current),
                    });
                }
            }
        }
    }
    samples.push(TempoSample::boundary());

    debug!(scenes = scenes.len(), samples = samples.len(), "tempo");
    Ok(samples)
}
