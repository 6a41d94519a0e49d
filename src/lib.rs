//! Screenstats: Query and Aggregation Engine for Screenplay Statistics
//!
//! Consumes an already tokenized screenplay and computes aggregated
//! statistics over it: day/night distribution, scene lengths, character
//! dialogue share, location frequency, page balance, a co-occurrence
//! network and a narrative tempo signal.
//!
//! # Core Concepts
//!
//! - **Tokens**: Typed screenplay elements produced by an external parser
//! - **Predicates**: Composable token tests gating counters and hooks
//! - **Queries**: Declarative one-pass definitions grouping tokens into records
//!
//! # Example
//!
//! ```
//! use screenstats::{days_and_nights, StatsConfig, Token};
//!
//! let tokens = vec![
//!     Token::scene_heading(1, "INT. KITCHEN - NIGHT"),
//!     Token::action(2, "The kettle whistles."),
//! ];
//! let result = days_and_nights().run(&tokens, &StatsConfig::default()).unwrap();
//! assert_eq!(result[0].key, "NIGHT");
//! ```

pub mod config;
pub mod query;
mod script;
pub mod stats;

pub use config::{PrintProfile, StatsConfig};
pub use query::{Counter, Filter, Group, GroupId, Predicate, Query, Record, StatsError, StatsResult};
pub use script::{Dual, Line, Token, TokenKind};
pub use stats::{
    basics, character_network, characters, days_and_nights, locations, locations_breakdown,
    page_balance, scene_length, tempo, Basics, CharacterNetwork, Statistics, TempoSample,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
