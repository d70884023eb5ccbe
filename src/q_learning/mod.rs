//! Tabular Q-learning
//!
//! Q-learning is off-policy temporal-difference control: every step moves
//! the estimate for the action taken toward the observed reward plus the
//! discounted best estimate at the successor state,
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//! ```
//!
//! ## Usage Example
//!
//! ```
//! use gridworld::{
//!     environment::Grid,
//!     pipeline::{TrainingConfig, TrainingPipeline, rollout},
//!     q_learning::QLearningAgent,
//! };
//!
//! let grid = Grid::build(10)?;
//! let mut agent = QLearningAgent::new(
//!     grid.size(),
//!     0.1, // learning_rate
//!     0.9, // discount_factor
//!     0.1, // epsilon (exploration)
//! )
//! .with_seed(7);
//!
//! let mut pipeline = TrainingPipeline::new(TrainingConfig::new(50));
//! pipeline.run(&mut agent, &grid)?;
//!
//! let outcome = rollout(agent.q_table(), &grid, Some(100))?;
//! println!("{:?}", outcome.path());
//! # Ok::<(), gridworld::Error>(())
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::{QLearningAgent, choose_action};
pub use q_table::QTable;
pub use serialization::{SavedQTable, TrainingMetadata};
