//! Reward surface

use serde::{Deserialize, Serialize};

use super::position::Position;
use crate::{Error, Result};

/// Reward for entering the goal cell
pub const GOAL_REWARD: f64 = 100.0;
/// Reward for entering an obstacle cell
pub const OBSTACLE_PENALTY: f64 = -10.0;
/// Reward for entering any other cell
pub const STEP_COST: f64 = -1.0;
/// Default grid side length
pub const DEFAULT_SIZE: usize = 10;
/// Obstacles placed on the default grid
pub const DEFAULT_OBSTACLES: [(usize, usize); 4] = [(2, 2), (3, 3), (4, 4), (5, 5)];

/// Parameters of a reward surface.
///
/// # Examples
///
/// ```
/// use gridworld::environment::{Grid, GridConfig};
///
/// let grid = Grid::from_config(&GridConfig::new(5).without_obstacles()).unwrap();
/// assert_eq!(grid.size(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Side length of the square grid
    pub size: usize,
    /// Reward at the goal cell `(size-1, size-1)`
    pub goal_reward: f64,
    /// Reward at every obstacle cell
    pub obstacle_penalty: f64,
    /// Reward at every other cell
    pub step_cost: f64,
    /// Obstacle cells
    pub obstacles: Vec<Position>,
}

impl GridConfig {
    /// Default rewards and obstacles on a grid of the given size
    pub fn new(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn with_obstacles<I, P>(mut self, obstacles: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Position>,
    {
        self.obstacles = obstacles.into_iter().map(Into::into).collect();
        self
    }

    pub fn without_obstacles(mut self) -> Self {
        self.obstacles.clear();
        self
    }

    pub fn with_rewards(mut self, goal_reward: f64, obstacle_penalty: f64, step_cost: f64) -> Self {
        self.goal_reward = goal_reward;
        self.obstacle_penalty = obstacle_penalty;
        self.step_cost = step_cost;
        self
    }

    /// Check the configuration without building a grid.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::InvalidConfiguration {
                message: "grid size must be at least 1".to_string(),
            });
        }
        for obstacle in &self.obstacles {
            if obstacle.row >= self.size || obstacle.col >= self.size {
                return Err(Error::ObstacleOutOfBounds {
                    row: obstacle.row,
                    col: obstacle.col,
                    size: self.size,
                });
            }
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            goal_reward: GOAL_REWARD,
            obstacle_penalty: OBSTACLE_PENALTY,
            step_cost: STEP_COST,
            obstacles: DEFAULT_OBSTACLES.iter().copied().map(Position::from).collect(),
        }
    }
}

/// Immutable N×N reward surface.
///
/// The start is always `(0, 0)` and the goal always `(N-1, N-1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    config: GridConfig,
    cells: Vec<f64>,
}

impl Grid {
    /// Build the default grid (standard rewards and obstacles) of the given size.
    ///
    /// Fails with [`Error::ObstacleOutOfBounds`] when `size` is too small to
    /// hold the default obstacles (below 6).
    pub fn build(size: usize) -> Result<Self> {
        Self::from_config(&GridConfig::new(size))
    }

    /// Build a grid from an explicit configuration.
    ///
    /// Duplicate obstacles are collapsed. The goal cell always holds the goal
    /// reward, so an obstacle listed there is dropped.
    pub fn from_config(config: &GridConfig) -> Result<Self> {
        config.validate()?;

        let size = config.size;
        let mut config = config.clone();
        let mut seen = vec![false; size * size];
        seen[size * size - 1] = true;
        config.obstacles.retain(|pos| {
            let idx = pos.row * size + pos.col;
            !std::mem::replace(&mut seen[idx], true)
        });

        let mut cells = vec![config.step_cost; size * size];
        for obstacle in &config.obstacles {
            cells[obstacle.row * size + obstacle.col] = config.obstacle_penalty;
        }
        cells[size * size - 1] = config.goal_reward;

        Ok(Self { config, cells })
    }

    pub fn size(&self) -> usize {
        self.config.size
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn start(&self) -> Position {
        Position::new(0, 0)
    }

    pub fn goal(&self) -> Position {
        Position::new(self.size() - 1, self.size() - 1)
    }

    pub fn obstacles(&self) -> &[Position] {
        &self.config.obstacles
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.config.obstacles.contains(&pos)
    }

    pub fn is_goal(&self, pos: Position) -> bool {
        pos == self.goal()
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.size() && col < self.size()
    }

    /// Reward observed on entering `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` lies outside the grid; positions produced by
    /// [`step`](super::step) never do.
    pub fn reward(&self, pos: Position) -> f64 {
        assert!(
            self.contains(pos.row, pos.col),
            "position {pos} outside {0}x{0} grid",
            self.size()
        );
        self.cells[pos.row * self.size() + pos.col]
    }

    /// Reward at `pos`, or an error when it lies outside the grid.
    pub fn try_reward(&self, pos: Position) -> Result<f64> {
        if self.contains(pos.row, pos.col) {
            Ok(self.cells[pos.row * self.size() + pos.col])
        } else {
            Err(Error::PositionOutOfBounds {
                row: pos.row,
                col: pos.col,
                size: self.size(),
            })
        }
    }

    /// All cell values in row-major order
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(grid: &Grid, value: f64) -> usize {
        grid.cells().iter().filter(|&&v| v == value).count()
    }

    #[test]
    fn test_default_grid_layout() {
        let grid = Grid::build(10).unwrap();
        assert_eq!(grid.size(), 10);
        assert_eq!(grid.reward(Position::new(9, 9)), GOAL_REWARD);
        for (r, c) in DEFAULT_OBSTACLES {
            assert_eq!(grid.reward(Position::new(r, c)), OBSTACLE_PENALTY);
        }
        assert_eq!(grid.reward(Position::new(0, 0)), STEP_COST);
        assert_eq!(count(&grid, GOAL_REWARD), 1);
        assert_eq!(count(&grid, OBSTACLE_PENALTY), 4);
        assert_eq!(count(&grid, STEP_COST), 100 - 5);
    }

    #[test]
    fn test_custom_rewards() {
        let config = GridConfig::new(4)
            .with_obstacles([(1, 2)])
            .with_rewards(50.0, -20.0, -0.5);
        let grid = Grid::from_config(&config).unwrap();
        assert_eq!(grid.reward(grid.goal()), 50.0);
        assert_eq!(grid.reward(Position::new(1, 2)), -20.0);
        assert_eq!(grid.reward(Position::new(0, 0)), -0.5);
        assert_eq!(count(&grid, -0.5), 16 - 2);
    }

    #[test]
    fn test_small_default_grid_rejects_obstacles() {
        let err = Grid::build(5).unwrap_err();
        assert!(matches!(
            err,
            Error::ObstacleOutOfBounds {
                row: 5,
                col: 5,
                size: 5
            }
        ));
    }

    #[test]
    fn test_zero_size_rejected() {
        let err = Grid::from_config(&GridConfig::new(0).without_obstacles()).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_single_cell_grid_is_goal() {
        let grid = Grid::from_config(&GridConfig::new(1).without_obstacles()).unwrap();
        assert_eq!(grid.start(), grid.goal());
        assert_eq!(grid.cells(), &[GOAL_REWARD]);
    }

    #[test]
    fn test_goal_overrides_obstacle() {
        let grid = Grid::build(6).unwrap();
        assert_eq!(grid.reward(grid.goal()), GOAL_REWARD);
        assert!(!grid.is_obstacle(grid.goal()));
        assert_eq!(grid.obstacles().len(), 3);
        assert_eq!(count(&grid, OBSTACLE_PENALTY), 3);
        assert_eq!(count(&grid, GOAL_REWARD), 1);
    }

    #[test]
    fn test_duplicate_obstacles_collapsed() {
        let config = GridConfig::new(4).with_obstacles([(1, 1), (1, 1), (2, 1)]);
        let grid = Grid::from_config(&config).unwrap();
        assert_eq!(grid.obstacles().len(), 2);
        assert_eq!(count(&grid, OBSTACLE_PENALTY), 2);
    }

    #[test]
    fn test_try_reward_out_of_bounds() {
        let grid = Grid::build(6).unwrap();
        assert!(matches!(
            grid.try_reward(Position::new(6, 0)),
            Err(Error::PositionOutOfBounds { .. })
        ));
    }
}
