//! Condition evaluation for choices and conditional blocks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::StateStore;
use crate::value::{Comparison, Value};

/// A pure boolean test over the state store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// Compare a variable against a literal (`check_var`).
    CheckVar {
        /// Variable key.
        key: String,
        /// Comparison operator.
        op: Comparison,
        /// Value to compare against.
        value: Value,
    },
    /// Compare a stat against an integer (`check_stat`).
    CheckStat {
        /// Stat key.
        key: String,
        /// Comparison operator.
        op: Comparison,
        /// Value to compare against.
        value: i64,
    },
    /// Compare an item count against an integer (`check_item`).
    CheckItem {
        /// Item key.
        key: String,
        /// Comparison operator.
        op: Comparison,
        /// Value to compare against.
        value: i64,
    },
    /// Require at least `count` of an item (`has_item`).
    ///
    /// Equivalent to `check_item` with `>=`; kept distinct so scripts
    /// round-trip in the form they were written.
    HasItem {
        /// Item key.
        key: String,
        /// Minimum count.
        count: i64,
    },
}

impl Condition {
    /// Source keyword for this condition's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Condition::CheckVar { .. } => "check_var",
            Condition::CheckStat { .. } => "check_stat",
            Condition::CheckItem { .. } => "check_item",
            Condition::HasItem { .. } => "has_item",
        }
    }

    /// Whether `kind` names a condition.
    pub fn is_kind(kind: &str) -> bool {
        matches!(kind, "check_var" | "check_stat" | "check_item" | "has_item")
    }

    /// The key this condition reads.
    pub fn key(&self) -> &str {
        match self {
            Condition::CheckVar { key, .. }
            | Condition::CheckStat { key, .. }
            | Condition::CheckItem { key, .. }
            | Condition::HasItem { key, .. } => key,
        }
    }

    /// Evaluate the condition. Never mutates the store.
    pub fn evaluate(&self, state: &StateStore) -> bool {
        match self {
            Condition::CheckVar { key, op, value } => state.get_var(key).compare(*op, value),
            Condition::CheckStat { key, op, value } => op.compare_ints(state.get_stat(key), *value),
            Condition::CheckItem { key, op, value } => op.compare_ints(state.get_item(key), *value),
            Condition::HasItem { key, count } => state.get_item(key) >= *count,
        }
    }
}

/// Formats the condition in its canonical source form, e.g. `check_stat:gold:>=:5`.
impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::CheckVar { key, op, value } => write!(f, "check_var:{key}:{op}:{value}"),
            Condition::CheckStat { key, op, value } => {
                write!(f, "check_stat:{key}:{op}:{value}")
            }
            Condition::CheckItem { key, op, value } => {
                write!(f, "check_item:{key}:{op}:{value}")
            }
            Condition::HasItem { key, count } => write!(f, "has_item:{key}:{count}"),
        }
    }
}
