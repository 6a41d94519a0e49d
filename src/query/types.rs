//! Query item and record types

use super::engine::StatsResult;
use super::group::Group;
use crate::script::Token;
use serde::Serialize;
use serde_json::{Map, Value};

/// A plain output record: field name → value.
pub type Record = Map<String, Value>;

/// Something a query can traverse.
///
/// Tokens are the usual source; derived queries may run over the group
/// records of an earlier run.
pub trait Item {
    /// Number of printed lines this item contributes to line-based counters.
    fn line_count(&self) -> usize {
        0
    }
}

impl Item for Token {
    fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl<K, A> Item for Group<K, A> {}

/// Flatten groups into plain records, writing each key under `label_field`.
///
/// Accumulators that do not serialize to an object are stored under `value`.
pub fn to_records<K: Serialize, A: Serialize>(
    label_field: Option<&str>,
    groups: &[Group<K, A>],
) -> StatsResult<Vec<Record>> {
    groups
        .iter()
        .map(|group| {
            let mut record = match serde_json::to_value(&group.data)? {
                Value::Object(map) => map,
                other => {
                    let mut map = Map::new();
                    map.insert("value".to_string(), other);
                    map
                }
            };
            if let Some(field) = label_field {
                record.insert(field.to_string(), serde_json::to_value(&group.key)?);
            }
            Ok(record)
        })
        .collect()
}
