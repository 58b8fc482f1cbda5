//! Tabular action-value function with epsilon-greedy selection
//!
//! Rows are created lazily, all zeros, the first time `act` or `update`
//! touches a state. The table therefore grows during training and callers
//! should not assume a fixed size.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::encoder::EncodedState;
use crate::game::RelativeAction;

/// Mixed into the run seed so the agent and environment draw from unrelated streams
pub const AGENT_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Q-learning agent backed by a lookup table
#[derive(Debug, Clone)]
pub struct QTable {
    actions: usize,
    table: HashMap<EncodedState, Vec<f32>>,
    rng: StdRng,
}

impl QTable {
    /// Create an empty table for `actions` actions
    ///
    /// # Panics
    ///
    /// Panics if `actions` is zero.
    pub fn new(actions: usize, seed: u64) -> Self {
        assert!(actions > 0, "a Q-table needs at least one action");
        Self {
            actions,
            table: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Empty table over the three relative snake actions
    pub fn for_snake(seed: u64) -> Self {
        Self::new(RelativeAction::COUNT, seed)
    }

    /// Epsilon-greedy action selection
    ///
    /// Explores uniformly with probability `epsilon`. Otherwise picks uniformly
    /// among every action sharing the maximal value.
    pub fn act(&mut self, state: EncodedState, epsilon: f32) -> usize {
        if self.rng.gen::<f32>() < epsilon {
            return self.rng.gen_range(0..self.actions);
        }

        let actions = self.actions;
        let values = self
            .table
            .entry(state)
            .or_insert_with(|| vec![0.0; actions]);
        let best = max_value(values);
        let maximizers: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == best)
            .map(|(i, _)| i)
            .collect();

        // `maximizers` is never empty: the max is drawn from `values` itself
        *maximizers.choose(&mut self.rng).unwrap_or(&0)
    }

    /// One-step Q-learning update
    ///
    /// `Q[s][a] += alpha * (r + gamma * max_a' Q[s2][a'] - Q[s][a])`
    ///
    /// Terminal transitions still bootstrap from `s2`.
    pub fn update(
        &mut self,
        state: EncodedState,
        action: usize,
        reward: f32,
        next_state: EncodedState,
        alpha: f32,
        gamma: f32,
    ) {
        let next_max = max_value(self.row_mut(next_state));
        let q = &mut self.row_mut(state)[action];
        let td_error = reward + gamma * next_max - *q;
        *q += alpha * td_error;
    }

    /// Deterministic best action, ties go to the lowest index
    ///
    /// Unseen states behave as all-zero rows and are not inserted.
    pub fn greedy(&self, state: EncodedState) -> usize {
        self.table.get(&state).map_or(0, |values| argmax(values))
    }

    /// Read-only lookup, `None` for states never visited
    pub fn values(&self, state: EncodedState) -> Option<&[f32]> {
        self.table.get(&state).map(Vec::as_slice)
    }

    /// Overwrite a row
    ///
    /// # Panics
    ///
    /// Panics if `values` does not hold exactly one entry per action.
    pub fn set_values(&mut self, state: EncodedState, values: &[f32]) {
        assert_eq!(
            values.len(),
            self.actions,
            "row for {state} must have {} values",
            self.actions
        );
        self.table.insert(state, values.to_vec());
    }

    /// Number of actions per row
    pub fn action_count(&self) -> usize {
        self.actions
    }

    /// Number of states with a row
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterate over all rows in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&EncodedState, &[f32])> {
        self.table.iter().map(|(k, v)| (k, v.as_slice()))
    }

    fn row_mut(&mut self, state: EncodedState) -> &mut Vec<f32> {
        let actions = self.actions;
        self.table
            .entry(state)
            .or_insert_with(|| vec![0.0; actions])
    }
}

fn max_value(values: &[f32]) -> f32 {
    values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

/// Index of the first maximal value
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
