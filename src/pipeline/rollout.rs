//! Greedy replay of a learned Q-table

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Result,
    environment::{Grid, Position, step},
    q_learning::QTable,
};

/// Result of a greedy rollout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RolloutOutcome {
    /// The goal was reached; `path` runs from the start to the goal inclusive
    Reached { path: Vec<Position> },
    /// `limit` steps were taken without reaching the goal
    StepLimit { path: Vec<Position>, limit: usize },
}

impl RolloutOutcome {
    /// Visited positions, start first
    pub fn path(&self) -> &[Position] {
        match self {
            RolloutOutcome::Reached { path } | RolloutOutcome::StepLimit { path, .. } => path,
        }
    }

    pub fn reached_goal(&self) -> bool {
        matches!(self, RolloutOutcome::Reached { .. })
    }

    /// Number of moves made
    pub fn steps(&self) -> usize {
        self.path().len().saturating_sub(1)
    }
}

/// Default rollout cap for a grid: one step per cell.
///
/// A greedy rollout is deterministic, so once it has taken `size * size`
/// steps without reaching the goal it has revisited a cell and is cycling.
pub fn default_max_steps(grid: &Grid) -> usize {
    grid.size() * grid.size()
}

/// Follow the greedy policy of `table` from the start cell.
///
/// No exploration is performed. With `max_steps = None` the rollout runs
/// until the goal is reached, which never happens if the greedy policy
/// cycles.
pub fn rollout(table: &QTable, grid: &Grid, max_steps: Option<usize>) -> Result<RolloutOutcome> {
    table.check_size(grid.size())?;

    let mut state = grid.start();
    let mut path = vec![state];

    while !grid.is_goal(state) {
        if let Some(limit) = max_steps.filter(|&limit| path.len() > limit) {
            debug!(limit, last = %state, "rollout hit the step cap");
            return Ok(RolloutOutcome::StepLimit { path, limit });
        }
        let action = table.greedy_action(state);
        (state, _) = step(state, action, grid);
        path.push(state);
    }

    debug!(steps = path.len() - 1, "rollout reached the goal");
    Ok(RolloutOutcome::Reached { path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{Action, GridConfig};

    fn open_grid(size: usize) -> Grid {
        Grid::from_config(&GridConfig::new(size).without_obstacles()).unwrap()
    }

    #[test]
    fn test_untrained_table_hits_step_limit() {
        let grid = open_grid(3);
        let table = QTable::new(3);
        let outcome = rollout(&table, &grid, Some(default_max_steps(&grid))).unwrap();
        match &outcome {
            RolloutOutcome::StepLimit { path, limit } => {
                assert_eq!(*limit, 9);
                assert_eq!(path.len(), 10);
                assert!(path.iter().all(|&p| p == Position::new(0, 0)));
            }
            other => panic!("expected step limit, got {other:?}"),
        }
        assert!(!outcome.reached_goal());
        assert_eq!(outcome.steps(), 9);
    }

    #[test]
    fn test_follows_greedy_actions() {
        let grid = open_grid(3);
        let mut table = QTable::new(3);
        table.set(Position::new(0, 0), Action::Down, 1.0);
        table.set(Position::new(1, 0), Action::Right, 1.0);
        table.set(Position::new(1, 1), Action::Right, 1.0);
        table.set(Position::new(1, 2), Action::Down, 1.0);

        let outcome = rollout(&table, &grid, None).unwrap();
        assert!(outcome.reached_goal());
        assert_eq!(
            outcome.path(),
            &[
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(1, 1),
                Position::new(1, 2),
                Position::new(2, 2),
            ]
        );
        assert_eq!(outcome.steps(), 4);
    }

    #[test]
    fn test_start_on_goal_is_trivial() {
        let grid = open_grid(1);
        let outcome = rollout(&QTable::new(1), &grid, Some(0)).unwrap();
        assert_eq!(outcome, RolloutOutcome::Reached {
            path: vec![Position::new(0, 0)]
        });
    }

    #[test]
    fn test_rejects_mismatched_table() {
        let grid = open_grid(3);
        assert!(rollout(&QTable::new(4), &grid, None).is_err());
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = RolloutOutcome::StepLimit {
            path: vec![Position::new(0, 0)],
            limit: 1,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "step_limit");
        assert_eq!(json["limit"], 1);
    }
}
