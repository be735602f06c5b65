//! Effects that modify the state store when a choice is selected.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::StateStore;
use crate::value::Value;

/// A mutation of exactly one state-store mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Overwrite a variable (`set_var`).
    SetVar {
        /// Variable key.
        key: String,
        /// New value.
        value: Value,
    },
    /// Overwrite a stat (`set_stat`).
    SetStat {
        /// Stat key.
        key: String,
        /// New value.
        value: i64,
    },
    /// Add a signed delta to a stat (`add_stat`).
    AddStat {
        /// Stat key.
        key: String,
        /// Signed delta.
        delta: i64,
    },
    /// Add to an item count (`add_item`).
    AddItem {
        /// Item key.
        key: String,
        /// Count to add.
        count: i64,
    },
    /// Remove from an item count (`remove_item`), applied as a negated add.
    RemoveItem {
        /// Item key.
        key: String,
        /// Count to remove.
        count: i64,
    },
    /// Add to a journal entry count (`add_journal`).
    AddJournal {
        /// Journal key.
        key: String,
        /// Count to add.
        count: i64,
    },
    /// Log an encounter for an external subsystem (`start_encounter`).
    StartEncounter {
        /// Encounter key.
        key: String,
    },
}

impl Effect {
    /// Source keyword for this effect's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Effect::SetVar { .. } => "set_var",
            Effect::SetStat { .. } => "set_stat",
            Effect::AddStat { .. } => "add_stat",
            Effect::AddItem { .. } => "add_item",
            Effect::RemoveItem { .. } => "remove_item",
            Effect::AddJournal { .. } => "add_journal",
            Effect::StartEncounter { .. } => "start_encounter",
        }
    }

    /// Whether `kind` names an effect.
    pub fn is_kind(kind: &str) -> bool {
        matches!(
            kind,
            "set_var"
                | "set_stat"
                | "add_stat"
                | "add_item"
                | "remove_item"
                | "add_journal"
                | "start_encounter"
        )
    }

    /// Apply the effect to the store.
    pub fn apply(&self, state: &mut StateStore) {
        log::debug!("apply {self}");
        match self {
            Effect::SetVar { key, value } => state.set_var(key.as_str(), value.clone()),
            Effect::SetStat { key, value } => state.set_stat(key.as_str(), *value),
            Effect::AddStat { key, delta } => state.add_stat(key.as_str(), *delta),
            Effect::AddItem { key, count } => state.add_item(key.as_str(), *count),
            Effect::RemoveItem { key, count } => {
                state.add_item(key.as_str(), count.saturating_neg())
            }
            Effect::AddJournal { key, count } => state.add_journal(key.as_str(), *count),
            Effect::StartEncounter { key } => state.start_encounter(key.as_str()),
        }
    }
}

/// Formats the effect in its canonical source form, e.g. `add_stat:gold:-5`.
impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::SetVar { key, value } => write!(f, "set_var:{key}:{value}"),
            Effect::SetStat { key, value } => write!(f, "set_stat:{key}:{value}"),
            Effect::AddStat { key, delta } => write!(f, "add_stat:{key}:{delta}"),
            Effect::AddItem { key, count } => write!(f, "add_item:{key}:{count}"),
            Effect::RemoveItem { key, count } => write!(f, "remove_item:{key}:{count}"),
            Effect::AddJournal { key, count } => write!(f, "add_journal:{key}:{count}"),
            Effect::StartEncounter { key } => write!(f, "start_encounter:{key}"),
        }
    }
}
