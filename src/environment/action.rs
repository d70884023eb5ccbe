//! The closed set of moves available to the agent

use std::fmt;

use serde::{Deserialize, Serialize};

/// A directional move
///
/// The declaration order is significant: it fixes each action's column in
/// the Q-table and breaks ties during greedy selection (earlier wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// Number of actions
    pub const COUNT: usize = 4;

    /// All actions in table order
    pub const ALL: [Action; Action::COUNT] =
        [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Stable index used for table addressing
    pub const fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }

    /// Inverse of [`Action::index`]
    pub fn from_index(index: usize) -> Option<Action> {
        Action::ALL.get(index).copied()
    }

    /// `(row_delta, col_delta)` applied by this move
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
        }
    }

    /// Single-character arrow used by the policy map
    pub fn arrow(self) -> char {
        match self {
            Action::Up => '^',
            Action::Down => 'v',
            Action::Left => '<',
            Action::Right => '>',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "UP",
            Action::Down => "DOWN",
            Action::Left => "LEFT",
            Action::Right => "RIGHT",
        };
        f.write_str(name)
    }
}
