//! Grouping arena: ordered key → accumulator records for a single run

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// Index of a group record inside one run's arena.
///
/// Only meaningful for the run that handed it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(usize);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A finished (or in-flight) group record: the grouping key and its accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group<K, A> {
    pub key: K,
    pub data: A,
}

impl<K, A> Group<K, A> {
    pub fn new(key: K, data: A) -> Self {
        Self { key, data }
    }
}

/// Records in first-seen order with a key index.
#[derive(Debug, Clone)]
pub struct Groups<K, A> {
    records: Vec<Group<K, A>>,
    index: HashMap<K, GroupId>,
}

impl<K, A> Default for Groups<K, A> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash, A: Clone> Groups<K, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the record for `key`, creating it from `template` on first use.
    ///
    /// The boolean is `true` when the record was created by this call.
    pub fn select(&mut self, key: K, template: &A) -> (GroupId, bool) {
        if let Some(id) = self.index.get(&key) {
            return (*id, false);
        }
        let id = GroupId(self.records.len());
        self.index.insert(key.clone(), id);
        self.records.push(Group::new(key, template.clone()));
        (id, true)
    }

    pub fn find(&self, key: &K) -> Option<GroupId> {
        self.index.get(key).copied()
    }
}

impl<K, A> Groups<K, A> {
    /// # Panics
    ///
    /// If `id` was not handed out by this arena.
    pub fn get(&self, id: GroupId) -> &Group<K, A> {
        &self.records[id.0]
    }

    /// # Panics
    ///
    /// If `id` was not handed out by this arena.
    pub fn get_mut(&mut self, id: GroupId) -> &mut Group<K, A> {
        &mut self.records[id.0]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the arena, yielding records in creation order.
    pub fn into_vec(self) -> Vec<Group<K, A>> {
        self.records
    }
}
