//! Observer port - abstraction for training observation and data collection
//!
//! Observers let the pipeline report progress, metrics or logs without
//! coupling the training loop to any output format.

use crate::{
    Result,
    environment::{Position, Transition},
    pipeline::training::EpisodeSummary,
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once
/// 2. For each episode:
///    - `on_episode_start(episode, start)`
///    - `on_step(episode, step, transition)` - after every learning update
///    - `on_episode_end(summary)`
/// 3. `on_training_end()` - once
///
/// Every method defaults to a no-op.
pub trait Observer: Send {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called before the first step; `start` is the agent's initial cell.
    fn on_episode_start(&mut self, _episode: usize, _start: Position) -> Result<()> {
        Ok(())
    }

    /// Called once per step, after the learner has been updated.
    ///
    /// `step` is 0-based within the episode.
    fn on_step(&mut self, _episode: usize, _step: usize, _transition: &Transition) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called when training completes. Flush files or finish progress bars here.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
