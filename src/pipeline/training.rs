//! Episodic training loop

use std::{fs::File, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    environment::{Grid, Transition},
    ports::{Learner, Observer},
};

/// Default number of training episodes
pub const DEFAULT_EPISODES: usize = 500;
/// Default per-episode step cap
pub const DEFAULT_MAX_STEPS_PER_EPISODE: usize = 10_000;

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Step cap per episode; `None` runs each episode until the goal is
    /// reached, however long that takes
    pub max_steps_per_episode: Option<usize>,

    /// Random seed passed to the learner before the first episode
    pub seed: Option<u64>,
}

impl TrainingConfig {
    pub fn new(episodes: usize) -> Self {
        Self {
            episodes,
            ..Self::default()
        }
    }

    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps_per_episode = max_steps;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_steps_per_episode == Some(0) {
            return Err(Error::InvalidConfiguration {
                message: "max steps per episode must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: DEFAULT_EPISODES,
            max_steps_per_episode: Some(DEFAULT_MAX_STEPS_PER_EPISODE),
            seed: None,
        }
    }
}

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeOutcome {
    /// The agent entered the goal cell
    ReachedGoal,
    /// The step cap was hit first
    StepLimit,
}

/// Summary of a single episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Episode index (0-based)
    pub episode: usize,
    pub outcome: EpisodeOutcome,
    /// Steps taken
    pub steps: usize,
    /// Undiscounted sum of rewards
    pub total_reward: f64,
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes run
    pub total_episodes: usize,

    /// Episodes that reached the goal
    pub completed_episodes: usize,

    /// Episodes cut off by the step cap
    pub truncated_episodes: usize,

    /// Steps taken across all episodes
    pub total_steps: usize,

    /// Mean steps per episode
    pub mean_episode_length: f64,

    /// Mean undiscounted return per episode
    pub mean_return: f64,

    /// Steps taken in the final episode
    pub final_episode_length: Option<usize>,
}

impl TrainingResult {
    /// Aggregate per-episode summaries
    pub fn from_episodes(episodes: &[EpisodeSummary]) -> Self {
        let total_episodes = episodes.len();
        let completed_episodes = episodes
            .iter()
            .filter(|e| e.outcome == EpisodeOutcome::ReachedGoal)
            .count();
        let total_steps: usize = episodes.iter().map(|e| e.steps).sum();
        let total_reward: f64 = episodes.iter().map(|e| e.total_reward).sum();

        let (mean_episode_length, mean_return) = if total_episodes > 0 {
            (
                total_steps as f64 / total_episodes as f64,
                total_reward / total_episodes as f64,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            total_episodes,
            completed_episodes,
            truncated_episodes: total_episodes - completed_episodes,
            total_steps,
            mean_episode_length,
            mean_return,
            final_episode_length: episodes.last().map(|e| e.steps),
        }
    }

    /// Whether every episode reached the goal
    pub fn all_completed(&self) -> bool {
        self.truncated_episodes == 0
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file =
            File::create(path).map_err(|e| Error::io(format!("create {}", path.display()), e))?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).map_err(|e| Error::io(format!("open {}", path.display()), e))?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Training pipeline driving a learner through episodes on a grid
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run all configured episodes.
    ///
    /// Each episode starts at the grid's start cell and ends on entering the
    /// goal cell or hitting the step cap. The learner is updated after every
    /// step.
    pub fn run(&mut self, agent: &mut dyn Learner, grid: &Grid) -> Result<TrainingResult> {
        self.config.validate()?;
        if let Some(seed) = self.config.seed {
            agent.set_rng_seed(seed)?;
        }

        info!(
            learner = agent.name(),
            episodes = self.config.episodes,
            grid_size = grid.size(),
            max_steps = ?self.config.max_steps_per_episode,
            "starting training"
        );

        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        let mut summaries = Vec::with_capacity(self.config.episodes);
        for episode in 0..self.config.episodes {
            let summary = self.run_episode(episode, agent, grid)?;
            if summary.outcome == EpisodeOutcome::StepLimit {
                warn!(
                    episode,
                    steps = summary.steps,
                    "episode hit the step cap before reaching the goal"
                );
            } else {
                debug!(
                    episode,
                    steps = summary.steps,
                    total_reward = summary.total_reward,
                    "episode complete"
                );
            }
            summaries.push(summary);
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = TrainingResult::from_episodes(&summaries);
        info!(
            completed = result.completed_episodes,
            truncated = result.truncated_episodes,
            mean_length = result.mean_episode_length,
            "training finished"
        );
        Ok(result)
    }

    fn run_episode(
        &mut self,
        episode: usize,
        agent: &mut dyn Learner,
        grid: &Grid,
    ) -> Result<EpisodeSummary> {
        let mut state = grid.start();
        for observer in &mut self.observers {
            observer.on_episode_start(episode, state)?;
        }

        let mut steps = 0;
        let mut total_reward = 0.0;
        let mut outcome = EpisodeOutcome::ReachedGoal;

        while !grid.is_goal(state) {
            if self.config.max_steps_per_episode.is_some_and(|cap| steps >= cap) {
                outcome = EpisodeOutcome::StepLimit;
                break;
            }

            let action = agent.select_action(state);
            let transition = Transition::observe(state, action, grid);
            agent.learn(&transition)?;

            for observer in &mut self.observers {
                observer.on_step(episode, steps, &transition)?;
            }

            total_reward += transition.reward;
            steps += 1;
            state = transition.next_state;
        }

        let summary = EpisodeSummary {
            episode,
            outcome,
            steps,
            total_reward,
        };
        for observer in &mut self.observers {
            observer.on_episode_end(&summary)?;
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        environment::{Action, GridConfig, Position},
        q_learning::QLearningAgent,
    };

    /// Walks right along the top row, then down the last column
    struct Staircase;

    impl Learner for Staircase {
        fn select_action(&mut self, state: Position) -> Action {
            if state.col < 3 { Action::Right } else { Action::Down }
        }

        fn name(&self) -> &str {
            "staircase"
        }
    }

    /// Never leaves the start cell
    struct Stuck;

    impl Learner for Stuck {
        fn select_action(&mut self, _state: Position) -> Action {
            Action::Up
        }

        fn name(&self) -> &str {
            "stuck"
        }
    }

    fn open_grid(size: usize) -> Grid {
        Grid::from_config(&GridConfig::new(size).without_obstacles()).unwrap()
    }

    #[test]
    fn test_fixed_policy_episode_lengths() {
        let grid = open_grid(4);
        let mut pipeline = TrainingPipeline::new(TrainingConfig::new(3));
        let result = pipeline.run(&mut Staircase, &grid).unwrap();

        assert_eq!(result.total_episodes, 3);
        assert_eq!(result.completed_episodes, 3);
        assert_eq!(result.total_steps, 18);
        assert_eq!(result.final_episode_length, Some(6));
        // five step costs then the goal reward
        assert!((result.mean_return - 95.0).abs() < 1e-9);
        assert!(result.all_completed());
    }

    #[test]
    fn test_uncapped_episodes_run_to_goal() {
        let grid = open_grid(4);
        let config = TrainingConfig::new(4).with_max_steps(None);
        let mut pipeline = TrainingPipeline::new(config);
        let result = pipeline.run(&mut Staircase, &grid).unwrap();

        assert_eq!(result.completed_episodes, 4);
        assert_eq!(result.truncated_episodes, 0);
        assert_eq!(result.total_steps, 24);
    }

    #[test]
    fn test_uncapped_learning_agent_completes_every_episode() {
        let grid = open_grid(5);
        let mut agent = QLearningAgent::new(5, 0.5, 0.9, 0.1);
        let config = TrainingConfig::new(30).with_max_steps(None).with_seed(11);
        let result = TrainingPipeline::new(config).run(&mut agent, &grid).unwrap();

        assert_eq!(result.completed_episodes, 30);
        assert!(result.all_completed());
    }

    #[test]
    fn test_step_cap_truncates_episodes() {
        let grid = open_grid(4);
        let config = TrainingConfig::new(2).with_max_steps(Some(25));
        let mut pipeline = TrainingPipeline::new(config);
        let result = pipeline.run(&mut Stuck, &grid).unwrap();

        assert_eq!(result.truncated_episodes, 2);
        assert_eq!(result.completed_episodes, 0);
        assert_eq!(result.total_steps, 50);
        assert!(!result.all_completed());
    }

    #[test]
    fn test_zero_step_cap_rejected() {
        let grid = open_grid(4);
        let config = TrainingConfig::new(1).with_max_steps(Some(0));
        let mut pipeline = TrainingPipeline::new(config);
        assert!(pipeline.run(&mut Stuck, &grid).is_err());
    }

    #[test]
    fn test_single_cell_grid_has_empty_episodes() {
        let grid = open_grid(1);
        let mut agent = QLearningAgent::new(1, 0.1, 0.9, 0.1);
        let mut pipeline = TrainingPipeline::new(TrainingConfig::new(5).with_seed(1));
        let result = pipeline.run(&mut agent, &grid).unwrap();
        assert_eq!(result.total_steps, 0);
        assert_eq!(result.completed_episodes, 5);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let grid = open_grid(5);
        let run = || {
            let mut agent = QLearningAgent::new(5, 0.5, 0.9, 0.1);
            let mut pipeline = TrainingPipeline::new(TrainingConfig::new(20).with_seed(99));
            pipeline.run(&mut agent, &grid).unwrap();
            agent.into_q_table()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_training_writes_goal_row_never() {
        let grid = open_grid(5);
        let mut agent = QLearningAgent::new(5, 0.5, 0.9, 0.1).with_seed(4);
        let mut pipeline = TrainingPipeline::new(TrainingConfig::new(10));
        pipeline.run(&mut agent, &grid).unwrap();
        assert!(
            agent
                .q_table()
                .action_values(grid.goal())
                .iter()
                .all(|&v| v == 0.0)
        );
    }

    #[test]
    fn test_result_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        let result = TrainingResult::from_episodes(&[EpisodeSummary {
            episode: 0,
            outcome: EpisodeOutcome::ReachedGoal,
            steps: 8,
            total_reward: 93.0,
        }]);
        result.save(&path).unwrap();
        let loaded = TrainingResult::load(&path).unwrap();
        assert_eq!(loaded.total_steps, 8);
        assert_eq!(loaded.completed_episodes, 1);
    }

    #[test]
    fn test_result_io_errors_name_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent").join("result.json");

        let err = TrainingResult::load(&missing).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("result.json"));

        let result = TrainingResult::from_episodes(&[]);
        let err = result.save(&missing).unwrap_err();
        assert!(err.to_string().contains(&missing.display().to_string()));
    }
}
