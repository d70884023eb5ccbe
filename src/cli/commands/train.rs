//! Train command - Train a Q-learning agent and replay its greedy path

use std::{
    fs::File,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;
use tracing::info;

use crate::{
    app::{
        AgentConfig,
        config::{DEFAULT_DISCOUNT_FACTOR, DEFAULT_EPSILON, DEFAULT_LEARNING_RATE},
    },
    cli::{
        config::{parse_obstacles, sanitize_summary_path},
        output::{
            animate_path, format_path, print_section, print_stats_table, print_subsection,
            render_policy,
        },
    },
    environment::{
        Grid, GridConfig,
        grid::{DEFAULT_SIZE, GOAL_REWARD, OBSTACLE_PENALTY, STEP_COST},
    },
    pipeline::{
        JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver, RolloutOutcome,
        TrainingConfig, TrainingPipeline, TrainingResult, default_max_steps, rollout,
        training::{DEFAULT_EPISODES, DEFAULT_MAX_STEPS_PER_EPISODE},
    },
    q_learning::{QLearningAgent, SavedQTable, TrainingMetadata},
};

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Grid side length
    #[arg(long, short = 'n', default_value_t = DEFAULT_SIZE)]
    pub size: usize,

    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = DEFAULT_EPISODES)]
    pub episodes: usize,

    /// Learning rate α (0.0-1.0]
    #[arg(long, short = 'a', default_value_t = DEFAULT_LEARNING_RATE)]
    pub alpha: f64,

    /// Discount factor γ (0.0-1.0]
    #[arg(long, short = 'g', default_value_t = DEFAULT_DISCOUNT_FACTOR)]
    pub gamma: f64,

    /// Exploration rate ε [0.0-1.0]
    #[arg(long, default_value_t = DEFAULT_EPSILON)]
    pub epsilon: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Step cap per training episode
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS_PER_EPISODE)]
    pub max_steps: usize,

    /// Run every training episode until the goal is reached, however long it takes
    #[arg(long, default_value_t = false, conflicts_with = "max_steps")]
    pub unbounded: bool,

    /// Step cap for the greedy rollout (defaults to size²)
    #[arg(long)]
    pub rollout_max_steps: Option<usize>,

    /// Obstacles as `row,col;row,col` (defaults to 2,2;3,3;4,4;5,5)
    #[arg(long, conflicts_with = "no_obstacles")]
    pub obstacles: Option<String>,

    /// Train on a grid without obstacles
    #[arg(long, default_value_t = false)]
    pub no_obstacles: bool,

    /// Reward for entering the goal cell
    #[arg(long, default_value_t = GOAL_REWARD)]
    pub goal_reward: f64,

    /// Reward for entering an obstacle cell
    #[arg(long, default_value_t = OBSTACLE_PENALTY)]
    pub obstacle_penalty: f64,

    /// Reward for entering any other cell
    #[arg(long, default_value_t = STEP_COST)]
    pub step_cost: f64,

    /// Output file for the trained Q-table
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Optional file for per-episode JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Include visited states in the JSONL observations
    #[arg(long, default_value_t = false, requires = "observations")]
    pub trajectories: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Print one grid frame per step of the learned path
    #[arg(long, default_value_t = false)]
    pub animate: bool,

    /// Pause between animation frames, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub delay_ms: u64,

    /// Show progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    grid: &'a GridConfig,
    agent: &'a AgentConfig,
    training: &'a TrainingResult,
    metrics: MetricsSummary,
    rollout: &'a RolloutOutcome,
}

fn grid_config(args: &TrainArgs) -> Result<GridConfig> {
    let config = GridConfig::new(args.size).with_rewards(
        args.goal_reward,
        args.obstacle_penalty,
        args.step_cost,
    );
    Ok(if args.no_obstacles {
        config.without_obstacles()
    } else if let Some(list) = &args.obstacles {
        config.with_obstacles(parse_obstacles(list)?)
    } else {
        config
    })
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let grid = Grid::from_config(&grid_config(&args)?).context("Invalid grid configuration")?;

    let mut agent_config = AgentConfig::new(args.alpha, args.gamma, args.epsilon);
    if let Some(seed) = args.seed {
        agent_config = agent_config.with_seed(seed);
    }
    let mut agent = QLearningAgent::from_config(grid.size(), &agent_config)
        .context("Invalid agent configuration")?;

    let training_config = TrainingConfig {
        episodes: args.episodes,
        max_steps_per_episode: (!args.unbounded).then_some(args.max_steps),
        seed: args.seed,
    };

    let metrics = Arc::new(Mutex::new(
        MetricsObserver::new().counting_obstacles(grid.config().obstacle_penalty),
    ));
    let mut pipeline = TrainingPipeline::new(training_config.clone())
        .with_observer(Box::new(Arc::clone(&metrics)));
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let mut observer = JsonlObserver::new(path)?;
        if args.trajectories {
            observer = observer.with_trajectories();
        }
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    print_section("Q-Learning Grid Navigation");
    print_stats_table(&[
        ("Grid", format!("{0}x{0}", grid.size())),
        ("Obstacles", format_path(grid.obstacles())),
        ("Episodes", args.episodes.to_string()),
        (
            "α / γ / ε",
            format!("{} / {} / {}", args.alpha, args.gamma, args.epsilon),
        ),
        (
            "Seed",
            args.seed.map_or_else(|| "random".to_string(), |s| s.to_string()),
        ),
    ]);

    let result = pipeline.run(&mut agent, &grid)?;
    let metrics = metrics
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .summary();

    print_subsection("Training");
    print_stats_table(&[
        ("Reached goal", result.completed_episodes.to_string()),
        ("Hit step cap", result.truncated_episodes.to_string()),
        ("Total steps", result.total_steps.to_string()),
        ("Mean length", format!("{:.1}", result.mean_episode_length)),
        ("Last 10 mean", format!("{:.1}", metrics.last_ten_mean_length)),
        ("Mean return", format!("{:.2}", result.mean_return)),
        ("Obstacle hits", metrics.obstacle_hits.to_string()),
    ]);

    let limit = args.rollout_max_steps.unwrap_or_else(|| default_max_steps(&grid));
    let outcome = rollout(agent.q_table(), &grid, Some(limit))?;
    info!(
        reached = outcome.reached_goal(),
        steps = outcome.steps(),
        "greedy rollout finished"
    );

    print_subsection("Greedy policy");
    print!("{}", render_policy(agent.q_table(), &grid));
    println!("\nAgent path: {}", format_path(outcome.path()));

    if args.animate {
        animate_path(&grid, outcome.path(), Duration::from_millis(args.delay_ms));
    }

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = File::create(&path)
            .with_context(|| format!("Failed to create summary file {}", path.display()))?;
        to_writer_pretty(
            file,
            &TrainingSummaryFile {
                grid: grid.config(),
                agent: &agent_config,
                training: &result,
                metrics,
                rollout: &outcome,
            },
        )?;
        println!("\nSummary written to {}", path.display());
    }

    if let Some(path) = &args.output {
        let metadata = TrainingMetadata::from_run(&agent_config, &training_config, &result);
        SavedQTable::new(&grid, agent.into_q_table(), metadata)?.save_to_file(path)?;
        println!("Q-table saved to {}", path.display());
    }

    if let RolloutOutcome::StepLimit { limit, .. } = outcome {
        bail!("Greedy rollout did not reach the goal within {limit} steps");
    }
    Ok(())
}
