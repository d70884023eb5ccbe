//! Deterministic transition function

use serde::{Deserialize, Serialize};

use super::{action::Action, grid::Grid, position::Position};

/// One observed step: `state --action--> next_state` with `reward`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: Position,
    pub action: Action,
    pub reward: f64,
    pub next_state: Position,
}

/// Apply `action` at `state`.
///
/// A move that would leave the grid is a no-op: the agent stays on `state`
/// and receives the reward of `state` itself, with no separate penalty for
/// bumping into the border.
pub fn step(state: Position, action: Action, grid: &Grid) -> (Position, f64) {
    let next_state = state.offset(action.delta(), grid.size()).unwrap_or(state);
    (next_state, grid.reward(next_state))
}

impl Transition {
    /// Run [`step`] and package the result
    pub fn observe(state: Position, action: Action, grid: &Grid) -> Self {
        let (next_state, reward) = step(state, action, grid);
        Self {
            state,
            action,
            reward,
            next_state,
        }
    }

    /// Whether the move was clamped at the border
    pub fn is_blocked(&self) -> bool {
        self.state == self.next_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::grid::{GOAL_REWARD, GridConfig, OBSTACLE_PENALTY, STEP_COST};

    fn grid() -> Grid {
        Grid::build(10).unwrap()
    }

    #[test]
    fn test_interior_moves() {
        let grid = grid();
        let s = Position::new(5, 3);
        assert_eq!(step(s, Action::Up, &grid), (Position::new(4, 3), STEP_COST));
        assert_eq!(step(s, Action::Down, &grid), (Position::new(6, 3), STEP_COST));
        assert_eq!(step(s, Action::Left, &grid), (Position::new(5, 2), STEP_COST));
        assert_eq!(step(s, Action::Right, &grid), (Position::new(5, 4), STEP_COST));
    }

    #[test]
    fn test_border_moves_stay_in_place() {
        let grid = grid();
        let corner = Position::new(0, 0);
        assert_eq!(step(corner, Action::Up, &grid).0, corner);
        assert_eq!(step(corner, Action::Left, &grid).0, corner);

        let far = Position::new(9, 0);
        assert_eq!(step(far, Action::Down, &grid).0, far);

        let right = Position::new(4, 9);
        assert_eq!(step(right, Action::Right, &grid).0, right);
    }

    #[test]
    fn test_blocked_move_returns_reward_of_current_cell() {
        let grid = grid();
        let goal = grid.goal();
        assert_eq!(step(goal, Action::Down, &grid), (goal, GOAL_REWARD));

        let config = GridConfig::new(3).with_obstacles([(0, 2)]);
        let grid = Grid::from_config(&config).unwrap();
        let obstacle = Position::new(0, 2);
        assert_eq!(step(obstacle, Action::Up, &grid), (obstacle, OBSTACLE_PENALTY));
        assert!(Transition::observe(obstacle, Action::Right, &grid).is_blocked());
    }

    #[test]
    fn test_entering_obstacle_and_goal() {
        let grid = grid();
        assert_eq!(
            step(Position::new(2, 1), Action::Right, &grid),
            (Position::new(2, 2), OBSTACLE_PENALTY)
        );
        assert_eq!(
            step(Position::new(8, 9), Action::Down, &grid),
            (Position::new(9, 9), GOAL_REWARD)
        );
    }
}
