//! Tabular Q-learning for grid navigation
//!
//! This crate provides:
//! - A square grid world with a goal cell, penalized obstacles and a step cost
//! - A dense Q-table and an epsilon-greedy Q-learning agent
//! - An episodic training pipeline with pluggable observers
//! - Greedy rollout of the learned policy
//! - Persistence and CSV export of trained tables
//! - A command-line front end with text rendering of the learned path

pub mod app;
pub mod cli;
pub mod environment;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod ports;
pub mod q_learning;

pub use app::AgentConfig;
pub use environment::{Action, Grid, GridConfig, Position, Transition, step};
pub use error::{Error, Result};
pub use pipeline::{RolloutOutcome, TrainingConfig, TrainingPipeline, TrainingResult, rollout};
pub use q_learning::{QLearningAgent, QTable, choose_action};
