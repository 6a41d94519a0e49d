//! Token predicates used to gate counters and hooks

use crate::script::{Token, TokenKind};
use serde::{Deserialize, Serialize};

/// A pure test over a single token.
///
/// Predicates are plain data so query definitions stay inspectable; build
/// them with [`is`], [`is_dialogue`], [`has_scene_time`], [`is_dual`],
/// [`any`] and compose with [`not`], [`Predicate::and`], [`Predicate::or`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// Matches every token
    Any,
    /// Token kind is one of the listed kinds
    Is { kinds: Vec<TokenKind> },
    /// Dialogue or character cue
    Dialogue,
    /// Scene heading whose time-of-day slot contains the (uppercase) label
    SceneTime { label: String },
    /// Token is part of a dual dialogue block
    Dual,
    Not { predicate: Box<Predicate> },
    All { predicates: Vec<Predicate> },
    AnyOf { predicates: Vec<Predicate> },
}

impl Predicate {
    pub fn matches(&self, token: &Token) -> bool {
        match self {
            Predicate::Any => true,
            Predicate::Is { kinds } => kinds.contains(&token.kind),
            Predicate::Dialogue => {
                matches!(token.kind, TokenKind::Dialogue | TokenKind::Character)
            }
            Predicate::SceneTime { label } => token
                .time_slot()
                .map(|slot| slot.to_uppercase().contains(label.as_str()))
                .unwrap_or(false),
            Predicate::Dual => token.dual.is_some(),
            Predicate::Not { predicate } => !predicate.matches(token),
            Predicate::All { predicates } => predicates.iter().all(|p| p.matches(token)),
            Predicate::AnyOf { predicates } => predicates.iter().any(|p| p.matches(token)),
        }
    }

    /// Both predicates must match
    pub fn and(self, other: Predicate) -> Predicate {
        match self {
            Predicate::All { mut predicates } => {
                predicates.push(other);
                Predicate::All { predicates }
            }
            first => Predicate::All {
                predicates: vec![first, other],
            },
        }
    }

    /// Either predicate may match
    pub fn or(self, other: Predicate) -> Predicate {
        match self {
            Predicate::AnyOf { mut predicates } => {
                predicates.push(other);
                Predicate::AnyOf { predicates }
            }
            first => Predicate::AnyOf {
                predicates: vec![first, other],
            },
        }
    }
}

impl std::ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        not(self)
    }
}

pub fn any() -> Predicate {
    Predicate::Any
}

/// True if the token kind is any of `kinds`.
pub fn is(kinds: impl IntoIterator<Item = TokenKind>) -> Predicate {
    Predicate::Is {
        kinds: kinds.into_iter().collect(),
    }
}

pub fn is_dialogue() -> Predicate {
    Predicate::Dialogue
}

/// True for scene headings whose time-of-day slot mentions `label`,
/// ignoring case.
pub fn has_scene_time(label: &str) -> Predicate {
    Predicate::SceneTime {
        label: label.to_uppercase(),
    }
}

pub fn is_dual() -> Predicate {
    Predicate::Dual
}

pub fn not(predicate: Predicate) -> Predicate {
    match predicate {
        Predicate::Not { predicate } => *predicate,
        other => Predicate::Not {
            predicate: Box::new(other),
        },
    }
}
