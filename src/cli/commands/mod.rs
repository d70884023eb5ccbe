//! Subcommand implementations

pub mod export;
pub mod rollout;
pub mod train;
