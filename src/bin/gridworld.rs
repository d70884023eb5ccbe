//! gridworld CLI - train, replay and export tabular Q-learning agents
//! on a grid navigation task

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "gridworld")]
#[command(version, about = "Q-learning grid navigation toolkit", long_about = None)]
struct Cli {
    /// Log per-episode progress (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent, then replay its greedy path
    Train(Box<gridworld::cli::commands::train::TrainArgs>),

    /// Replay a saved Q-table
    Rollout(gridworld::cli::commands::rollout::RolloutArgs),

    /// Export a saved Q-table as CSV
    Export(gridworld::cli::commands::export::ExportArgs),
}

fn init_logging(verbose: bool) {
    let default = if verbose { "gridworld=debug" } else { "gridworld=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Train(args) => gridworld::cli::commands::train::execute(*args),
        Commands::Rollout(args) => gridworld::cli::commands::rollout::execute(args),
        Commands::Export(args) => gridworld::cli::commands::export::execute(args),
    }
}
