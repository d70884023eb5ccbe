//! Dense Q-table for grid navigation

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    environment::{Action, Position},
};

/// Q-table mapping (row, col, action) to an estimated discounted return
///
/// Values live in a flat row-major buffer addressed as
/// `(row * size + col) * Action::COUNT + action.index()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    /// Side length of the grid this table covers
    size: usize,
    /// Q-values, `size * size * Action::COUNT` entries
    values: Vec<f64>,
}

impl QTable {
    /// Create a zero-initialized table for a `size`x`size` grid
    pub fn new(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * size * Action::COUNT],
        }
    }

    /// Rebuild a table from raw row-major values
    pub fn from_values(size: usize, values: Vec<f64>) -> Result<Self> {
        let expected = size * size * Action::COUNT;
        if values.len() != expected {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "Q-table for a {size}x{size} grid needs {expected} values, got {}",
                    values.len()
                ),
            });
        }
        Ok(Self { size, values })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// # Panics
    ///
    /// Panics if `state` lies outside the table's grid.
    fn offset(&self, state: Position) -> usize {
        assert!(
            state.row < self.size && state.col < self.size,
            "position {state} outside {0}x{0} Q-table",
            self.size
        );
        (state.row * self.size + state.col) * Action::COUNT
    }

    /// Get Q-value for a state-action pair.
    ///
    /// Like every per-state accessor, panics if `state` is off the grid.
    pub fn get(&self, state: Position, action: Action) -> f64 {
        self.values[self.offset(state) + action.index()]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: Position, action: Action, value: f64) {
        let idx = self.offset(state) + action.index();
        self.values[idx] = value;
    }

    /// All action values at `state`, in [`Action::ALL`] order
    pub fn action_values(&self, state: Position) -> &[f64] {
        let start = self.offset(state);
        &self.values[start..start + Action::COUNT]
    }

    /// Maximum Q-value over all actions in a state
    pub fn max_q(&self, state: Position) -> f64 {
        self.action_values(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Select greedy action (highest Q-value).
    ///
    /// Scans in [`Action::ALL`] order and keeps the first maximum, so ties
    /// resolve to the lowest action index.
    pub fn greedy_action(&self, state: Position) -> Action {
        let values = self.action_values(state);
        let mut best = 0;
        for (idx, &value) in values.iter().enumerate().skip(1) {
            if value > values[best] {
                best = idx;
            }
        }
        Action::ALL[best]
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    pub fn q_learning_update(
        &mut self,
        state: Position,
        action: Action,
        reward: f64,
        next_state: Position,
        learning_rate: f64,
        discount_factor: f64,
    ) {
        let current_q = self.get(state, action);
        let td_target = reward + discount_factor * self.max_q(next_state);
        let td_error = td_target - current_q;
        self.set(state, action, current_q + learning_rate * td_error);
    }

    /// Ensure this table can be used with a grid of side `size`
    pub fn check_size(&self, size: usize) -> Result<()> {
        if self.size != size {
            return Err(Error::TableSizeMismatch {
                table: self.size,
                grid: size,
            });
        }
        Ok(())
    }

    /// Iterate `(position, action, value)` in row-major, then action order
    pub fn entries(&self) -> impl Iterator<Item = (Position, Action, f64)> + '_ {
        self.values.iter().enumerate().map(move |(idx, &value)| {
            let cell = idx / Action::COUNT;
            let pos = Position::new(cell / self.size, cell % self.size);
            (pos, Action::ALL[idx % Action::COUNT], value)
        })
    }

    /// Raw row-major values
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
