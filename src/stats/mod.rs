//! Statistics catalog
//!
//! Every analysis is a [`Query`](crate::query::Query) definition (or a short
//! chain of them) over the token sequence. [`Statistics::compute`] runs the
//! whole catalog and gathers the results in one serializable report.

pub mod basics;
pub mod characters;
pub mod days_and_nights;
pub mod locations;
pub mod network;
pub mod page_balance;
pub mod scene_length;
pub mod tempo;

pub use basics::{basics, Basics};
pub use characters::{characters, CharacterStats, Characters};
pub use days_and_nights::{days_and_nights, scene_total, DaysAndNights, TimeOfDayCount};
pub use locations::{locations, locations_breakdown, LocationCount, LocationRun};
pub use network::{character_network, CharacterNetwork, Link, NetworkReport, SceneCast};
pub use page_balance::{page_balance, PageBalance};
pub use scene_length::{scene_length, SceneLength, SceneType};
pub use tempo::{tempo, tempo_scenes, TempoSample, TEMPO_DECAY};

use crate::config::StatsConfig;
use crate::query::{Record, StatsResult};
use crate::script::Token;
use serde::Serialize;
use tracing::info;

/// `numerator / denominator`, or 0 when the denominator is 0.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// All analyses of one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub days_and_nights: Vec<Record>,
    pub scene_length: Vec<Record>,
    pub basics: Basics,
    pub characters: Vec<Record>,
    pub locations: Vec<Record>,
    pub locations_breakdown: Vec<Record>,
    pub network: NetworkReport,
    pub page_balance: Vec<Record>,
    pub tempo: Vec<TempoSample>,
}

impl Statistics {
    pub fn compute(tokens: &[Token], config: &StatsConfig) -> StatsResult<Self> {
        config.validate()?;
        info!(tokens = tokens.len(), "computing statistics");

        let basics = Basics::compute(tokens, config)?;

        let days_and_nights = self::days_and_nights();
        let days_and_nights = days_and_nights.records(&days_and_nights.run(tokens, config)?)?;

        let scene_length = self::scene_length();
        let scene_length = scene_length.records(&scene_length.run(tokens, config)?)?;

        let characters = self::characters(&basics).sort_by("lines", |c| c.lines as f64);
        let characters = characters.records(&characters.run(tokens, config)?)?;

        let locations = self::locations();
        let locations = locations.records(&locations.run(tokens, config)?)?;

        let breakdown = self::locations_breakdown();
        let locations_breakdown = breakdown.records(&breakdown.run(tokens, config)?)?;

        let network = character_network(tokens, config, &basics)?.to_records()?;

        let page_balance = self::page_balance();
        let page_balance = page_balance.records(&page_balance.run(tokens, config)?)?;

        let tempo = self::tempo(tokens, config)?;

        Ok(Self {
            days_and_nights,
            scene_length,
            basics,
            characters,
            locations,
            locations_breakdown,
            network,
            page_balance,
            tempo,
        })
    }
}
