//! The mutable session data that conditions read and effects write.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Variables, stats, items, and journal entries for one play session, plus
/// the ordered log of triggered encounters.
///
/// Every read is total: an absent variable reads as `false`, and an absent
/// stat, item, or journal entry reads as `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateStore {
    #[serde(default)]
    variables: BTreeMap<String, Value>,
    #[serde(default)]
    stats: BTreeMap<String, i64>,
    #[serde(default)]
    items: BTreeMap<String, i64>,
    #[serde(default)]
    journal: BTreeMap<String, i64>,
    #[serde(default)]
    encounters: Vec<String>,
}

impl StateStore {
    /// Create an empty state store.
    pub fn new() -> Self {
        Self::default()
    }

    // -- Variables --

    /// Read a variable, defaulting to `false`.
    pub fn get_var(&self, key: &str) -> Value {
        self.variables
            .get(key)
            .cloned()
            .unwrap_or(Value::Bool(false))
    }

    /// Overwrite a variable.
    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(key.into(), value.into());
    }

    /// All variables that have been set.
    pub fn variables(&self) -> &BTreeMap<String, Value> {
        &self.variables
    }

    // -- Stats --

    /// Read a stat, defaulting to `0`.
    pub fn get_stat(&self, key: &str) -> i64 {
        self.stats.get(key).copied().unwrap_or(0)
    }

    /// Overwrite a stat.
    pub fn set_stat(&mut self, key: impl Into<String>, value: i64) {
        self.stats.insert(key.into(), value);
    }

    /// Add a signed delta to a stat.
    pub fn add_stat(&mut self, key: impl Into<String>, delta: i64) {
        let entry = self.stats.entry(key.into()).or_insert(0);
        *entry = entry.saturating_add(delta);
    }

    /// All stats that have been set.
    pub fn stats(&self) -> &BTreeMap<String, i64> {
        &self.stats
    }

    // -- Items --

    /// Read an item count, defaulting to `0`.
    pub fn get_item(&self, key: &str) -> i64 {
        self.items.get(key).copied().unwrap_or(0)
    }

    /// Overwrite an item count. Counts at or below zero remove the item.
    pub fn set_item(&mut self, key: impl Into<String>, count: i64) {
        let key = key.into();
        if count > 0 {
            self.items.insert(key, count);
        } else {
            self.items.remove(&key);
        }
    }

    /// Add a signed delta to an item count, never going below zero.
    pub fn add_item(&mut self, key: impl Into<String>, delta: i64) {
        let key = key.into();
        let current = self.get_item(&key);
        let next = current.saturating_add(delta);
        if next < 0 {
            log::debug!("item {key} would drop to {next}, clamping to 0");
        }
        self.set_item(key, next);
    }

    /// All items currently held.
    pub fn items(&self) -> &BTreeMap<String, i64> {
        &self.items
    }

    // -- Journal --

    /// Read a journal entry count, defaulting to `0`.
    pub fn get_journal(&self, key: &str) -> i64 {
        self.journal.get(key).copied().unwrap_or(0)
    }

    /// Overwrite a journal entry count.
    pub fn set_journal(&mut self, key: impl Into<String>, count: i64) {
        self.journal.insert(key.into(), count);
    }

    /// Add a signed delta to a journal entry count.
    pub fn add_journal(&mut self, key: impl Into<String>, delta: i64) {
        let entry = self.journal.entry(key.into()).or_insert(0);
        *entry = entry.saturating_add(delta);
    }

    /// All journal entries that have been recorded.
    pub fn journal(&self) -> &BTreeMap<String, i64> {
        &self.journal
    }

    // -- Encounters --

    /// Append an encounter to the log.
    pub fn start_encounter(&mut self, key: impl Into<String>) {
        self.encounters.push(key.into());
    }

    /// Encounters triggered so far, oldest first.
    pub fn encounters(&self) -> &[String] {
        &self.encounters
    }

    /// Drain the encounter log, e.g. once an external subsystem has handled it.
    pub fn clear_encounters(&mut self) -> Vec<String> {
        std::mem::take(&mut self.encounters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_keys_read_as_defaults() {
        let state = StateStore::new();
        assert_eq!(state.get_var("seeking_treasure"), Value::Bool(false));
        assert_eq!(state.get_stat("gold"), 0);
        assert_eq!(state.get_item("Torch"), 0);
        assert_eq!(state.get_journal("met_elder"), 0);
        assert!(state.encounters().is_empty());
    }

    #[test]
    fn set_overwrites_add_accumulates() {
        let mut state = StateStore::new();
        state.set_stat("gold", 10);
        state.set_stat("gold", 10);
        assert_eq!(state.get_stat("gold"), 10);

        state.add_stat("gold", 5);
        state.add_stat("gold", 5);
        assert_eq!(state.get_stat("gold"), 20);

        state.add_stat("courage", -5);
        assert_eq!(state.get_stat("courage"), -5);
    }

    #[test]
    fn items_never_go_negative() {
        let mut state = StateStore::new();
        state.add_item("Torch", 2);
        state.add_item("Torch", -5);
        assert_eq!(state.get_item("Torch"), 0);
        assert!(!state.items().contains_key("Torch"));

        state.set_item("Rope", -3);
        assert_eq!(state.get_item("Rope"), 0);
    }

    #[test]
    fn variables_hold_any_value() {
        let mut state = StateStore::new();
        state.set_var("seeking_treasure", true);
        state.set_var("mood", "grim");
        state.set_var("visits", 3);
        assert_eq!(state.get_var("seeking_treasure"), Value::Bool(true));
        assert_eq!(state.get_var("mood"), Value::Str("grim".into()));
        assert_eq!(state.get_var("visits"), Value::Int(3));
    }

    #[test]
    fn encounter_log_is_ordered() {
        let mut state = StateStore::new();
        state.start_encounter("wolves");
        state.start_encounter("bandits");
        assert_eq!(state.encounters(), ["wolves", "bandits"]);
        assert_eq!(state.clear_encounters(), vec!["wolves", "bandits"]);
        assert!(state.encounters().is_empty());
    }

    #[test]
    fn json_round_trip() {
        let mut state = StateStore::new();
        state.set_var("door_open", true);
        state.set_stat("gold", 7);
        state.add_item("Torch", 1);
        state.add_journal("rumors", 2);
        state.start_encounter("ambush");

        let json = serde_json::to_string(&state).unwrap();
        let back: StateStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn missing_maps_deserialize_empty() {
        let state: StateStore = serde_json::from_str(r#"{"stats":{"gold":3}}"#).unwrap();
        assert_eq!(state.get_stat("gold"), 3);
        assert_eq!(state.get_item("Torch"), 0);
    }
}
