//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::training::{EpisodeOutcome, EpisodeSummary};
use crate::{
    Error, Result,
    environment::{Position, Transition},
    ports::Observer,
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    completed: usize,
    truncated: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            completed: 0,
            truncated: 0,
        }
    }

    fn message(&self) -> String {
        format!("goal:{} capped:{}", self.completed, self.truncated)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        match summary.outcome {
            EpisodeOutcome::ReachedGoal => self.completed += 1,
            EpisodeOutcome::StepLimit => self.truncated += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks per-episode lengths and returns
#[derive(Debug, Default)]
pub struct MetricsObserver {
    episodes: Vec<EpisodeSummary>,
    blocked_moves: usize,
    obstacle_hits: usize,
    obstacle_penalty: Option<f64>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Also count steps whose reward equals `penalty`, i.e. obstacle entries
    pub fn counting_obstacles(mut self, penalty: f64) -> Self {
        self.obstacle_penalty = Some(penalty);
        self
    }

    pub fn episodes(&self) -> &[EpisodeSummary] {
        &self.episodes
    }

    /// Moves that bumped into the border
    pub fn blocked_moves(&self) -> usize {
        self.blocked_moves
    }

    pub fn obstacle_hits(&self) -> usize {
        self.obstacle_hits
    }

    /// Mean episode length over the last `window` episodes
    pub fn recent_mean_length(&self, window: usize) -> f64 {
        let start = self.episodes.len().saturating_sub(window);
        let recent = &self.episodes[start..];
        if recent.is_empty() {
            0.0
        } else {
            recent.iter().map(|e| e.steps).sum::<usize>() as f64 / recent.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        let lengths = self.episodes.iter().map(|e| e.steps);
        MetricsSummary {
            total_episodes: self.episodes.len(),
            shortest_episode: lengths.clone().min(),
            longest_episode: lengths.max(),
            last_ten_mean_length: self.recent_mean_length(10),
            blocked_moves: self.blocked_moves,
            obstacle_hits: self.obstacle_hits,
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub shortest_episode: Option<usize>,
    pub longest_episode: Option<usize>,
    pub last_ten_mean_length: f64,
    pub blocked_moves: usize,
    pub obstacle_hits: usize,
}

impl Observer for MetricsObserver {
    fn on_step(&mut self, _episode: usize, _step: usize, transition: &Transition) -> Result<()> {
        if transition.is_blocked() {
            self.blocked_moves += 1;
        }
        if self.obstacle_penalty == Some(transition.reward) {
            self.obstacle_hits += 1;
        }
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.episodes.push(summary.clone());
        Ok(())
    }
}

/// Shared observer - lets the caller read an observer back after the
/// pipeline (which owns its observers) has finished
impl<T: Observer> Observer for Arc<Mutex<T>> {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_training_start(total_episodes)
    }

    fn on_episode_start(&mut self, episode: usize, start: Position) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_episode_start(episode, start)
    }

    fn on_step(&mut self, episode: usize, step: usize, transition: &Transition) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_step(episode, step, transition)
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_episode_end(summary)
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_training_end()
    }
}

/// Complete record of one training episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRecord {
    #[serde(flatten)]
    pub summary: EpisodeSummary,
    /// States visited, start first; only present when trajectories are recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trajectory: Option<Vec<Position>>,
}

/// JSONL observer - Exports one JSON object per episode
pub struct JsonlObserver {
    writer: BufWriter<File>,
    record_trajectories: bool,
    trajectory: Vec<Position>,
}

impl JsonlObserver {
    /// Create a new JSONL observer writing to `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| Error::io(format!("create {}", path.display()), e))?;
        Ok(Self {
            writer: BufWriter::new(file),
            record_trajectories: false,
            trajectory: Vec::new(),
        })
    }

    /// Include the visited states of every episode
    pub fn with_trajectories(mut self) -> Self {
        self.record_trajectories = true;
        self
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize, start: Position) -> Result<()> {
        self.trajectory.clear();
        if self.record_trajectories {
            self.trajectory.push(start);
        }
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, _step: usize, transition: &Transition) -> Result<()> {
        if self.record_trajectories {
            self.trajectory.push(transition.next_state);
        }
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        let record = EpisodeRecord {
            summary: summary.clone(),
            trajectory: self
                .record_trajectories
                .then(|| std::mem::take(&mut self.trajectory)),
        };

        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
