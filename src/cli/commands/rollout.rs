//! Rollout command - Replay a saved Q-table greedily

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::{
    cli::output::{
        animate_path, format_path, print_section, print_stats_table, print_subsection,
        render_policy,
    },
    pipeline::{RolloutOutcome, default_max_steps, rollout},
    q_learning::SavedQTable,
};

#[derive(Parser, Debug)]
#[command(about = "Replay a trained Q-table without exploration")]
pub struct RolloutArgs {
    /// Path to a Q-table saved by `train --output`
    pub table: PathBuf,

    /// Step cap for the rollout (defaults to size²)
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Print the greedy action of every cell
    #[arg(long, default_value_t = false)]
    pub policy: bool,

    /// Print one grid frame per step of the path
    #[arg(long, default_value_t = false)]
    pub animate: bool,

    /// Pause between animation frames, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub delay_ms: u64,
}

pub fn execute(args: RolloutArgs) -> Result<()> {
    let saved = SavedQTable::load_from_file(&args.table)
        .with_context(|| format!("Failed to load Q-table from {}", args.table.display()))?;
    let grid = saved.grid()?;

    print_section("Greedy Rollout");
    let meta = &saved.metadata;
    print_stats_table(&[
        ("Grid", format!("{0}x{0}", grid.size())),
        (
            "Episodes trained",
            meta.episodes.map_or_else(|| "unknown".to_string(), |e| e.to_string()),
        ),
        (
            "Seed",
            meta.seed.map_or_else(|| "none".to_string(), |s| s.to_string()),
        ),
    ]);

    if args.policy {
        print_subsection("Greedy policy");
        print!("{}", render_policy(&saved.table, &grid));
    }

    let limit = args.max_steps.unwrap_or_else(|| default_max_steps(&grid));
    let outcome = rollout(&saved.table, &grid, Some(limit))?;
    println!("\nAgent path: {}", format_path(outcome.path()));

    if args.animate {
        animate_path(&grid, outcome.path(), Duration::from_millis(args.delay_ms));
    }

    if let RolloutOutcome::StepLimit { limit, .. } = outcome {
        bail!("Greedy rollout did not reach the goal within {limit} steps");
    }
    println!("Reached the goal in {} steps", outcome.steps());
    Ok(())
}
