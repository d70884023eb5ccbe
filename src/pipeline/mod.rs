//! Training and evaluation pipeline
//!
//! This module provides:
//! - The episodic training loop with an optional per-episode step cap
//! - Greedy rollout of a learned table
//! - Observers recording progress, metrics and episode logs

pub mod observers;
pub mod rollout;
pub mod training;

pub use observers::{
    EpisodeRecord, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
};
pub use rollout::{RolloutOutcome, default_max_steps, rollout};
pub use training::{
    EpisodeOutcome, EpisodeSummary, TrainingConfig, TrainingPipeline, TrainingResult,
};

pub use crate::ports::{Learner, Observer};
