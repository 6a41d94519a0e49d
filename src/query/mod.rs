//! Query engine for screenplay statistics
//!
//! Provides token predicates, the grouping arena, and the query
//! definition/execution engine every statistic is built from.

mod engine;
mod group;
pub mod predicate;
mod types;

pub use engine::{Counter, Env, Filter, Increment, Query, RunContext, StatsError, StatsResult};
pub use group::{Group, GroupId, Groups};
pub use predicate::{any, has_scene_time, is, is_dialogue, is_dual, not, Predicate};
pub use types::{to_records, Item, Record};
