//! Value table for tabular Q-learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::StateKey;

/// Mapping from state to the per-action values learned for that state.
///
/// Entries are created lazily: a state appears only once the agent has
/// evaluated at least one action from it (or a successor was seeded during an
/// update), and actions within a state appear only once evaluated. The table
/// never evicts; it is the agent's entire long-term memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    entries: HashMap<StateKey, HashMap<usize, f64>>,
}

impl QTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value without creating it
    pub fn get(&self, state: &StateKey, action: usize) -> Option<f64> {
        self.entries.get(state).and_then(|actions| actions.get(&action)).copied()
    }

    /// Look up a value, inserting the 0.0 default for unseen pairs.
    ///
    /// This is the explicit form of the "unknown = neutral" assumption: the
    /// insertion is an intentional side effect of evaluating an action.
    pub fn get_or_insert(&mut self, state: &StateKey, action: usize) -> f64 {
        *self
            .entries
            .entry(state.clone())
            .or_default()
            .entry(action)
            .or_insert(0.0)
    }

    /// Overwrite one value
    pub fn set(&mut self, state: &StateKey, action: usize, value: f64) {
        debug_assert!(value.is_finite(), "non-finite value written to table");
        self.entries
            .entry(state.clone())
            .or_default()
            .insert(action, value);
    }

    /// Whether the state has an entry (possibly with no actions yet)
    pub fn contains_state(&self, state: &StateKey) -> bool {
        self.entries.contains_key(state)
    }

    /// Create the state entry if absent, without seeding any actions
    pub fn ensure_state(&mut self, state: &StateKey) {
        self.entries.entry(state.clone()).or_default();
    }

    /// Seed a 0.0 entry for each listed action that is not yet present
    pub fn ensure_actions(&mut self, state: &StateKey, actions: &[usize]) {
        let entry = self.entries.entry(state.clone()).or_default();
        for &action in actions {
            entry.entry(action).or_insert(0.0);
        }
    }

    /// Maximum value among the given actions, reading missing pairs as 0.0
    /// without inserting them. Returns 0.0 for an empty action set.
    pub fn max_over(&self, state: &StateKey, actions: &[usize]) -> f64 {
        if actions.is_empty() {
            return 0.0;
        }
        actions
            .iter()
            .map(|&action| self.get(state, action).unwrap_or(0.0))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Number of states with an entry
    pub fn states_known(&self) -> usize {
        self.entries.len()
    }

    /// Total number of (state, action) values stored
    pub fn values_known(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    /// Whether the table holds no states at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all state entries
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &HashMap<usize, f64>)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::BoardState;

    fn key(s: &str) -> StateKey {
        BoardState::from_string(s).unwrap().key()
    }

    #[test]
    fn test_lazy_default_insertion() {
        let mut table = QTable::new();
        let state = key("X        ");

        assert_eq!(table.get(&state, 4), None);
        assert_eq!(table.get_or_insert(&state, 4), 0.0);
        assert_eq!(table.get(&state, 4), Some(0.0));
        assert_eq!(table.values_known(), 1);
    }

    #[test]
    fn test_set_get() {
        let mut table = QTable::new();
        let state = key("         ");
        table.set(&state, 0, 1.5);
        assert_eq!(table.get(&state, 0), Some(1.5));
        assert_eq!(table.states_known(), 1);
    }

    #[test]
    fn test_ensure_actions_fills_only_missing() {
        let mut table = QTable::new();
        let state = key("         ");
        table.set(&state, 1, 2.0);
        table.ensure_actions(&state, &[0, 1, 2]);

        assert_eq!(table.get(&state, 0), Some(0.0));
        assert_eq!(table.get(&state, 1), Some(2.0));
        assert_eq!(table.get(&state, 2), Some(0.0));
    }

    #[test]
    fn test_max_over_reads_without_inserting() {
        let mut table = QTable::new();
        let state = key("         ");
        table.set(&state, 0, -0.5);
        table.set(&state, 1, 1.5);

        assert_eq!(table.max_over(&state, &[0, 1, 2]), 1.5);
        // Action 2 was read as 0.0 but not created.
        assert_eq!(table.get(&state, 2), None);
    }

    #[test]
    fn test_max_over_empty_action_set() {
        let table = QTable::new();
        assert_eq!(table.max_over(&key("         "), &[]), 0.0);
    }

    #[test]
    fn test_max_over_all_negative() {
        let mut table = QTable::new();
        let state = key("         ");
        table.set(&state, 0, -2.0);
        table.set(&state, 1, -1.0);
        assert_eq!(table.max_over(&state, &[0, 1]), -1.0);
    }

    #[test]
    fn test_ensure_state_creates_empty_entry() {
        let mut table = QTable::new();
        let state = key("         ");
        table.ensure_state(&state);
        assert!(table.contains_state(&state));
        assert_eq!(table.values_known(), 0);
    }
}
