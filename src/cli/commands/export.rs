//! Export command - Write a saved Q-table as CSV

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{export::export_q_table_csv, q_learning::SavedQTable};

#[derive(Parser, Debug)]
#[command(about = "Export a trained Q-table as CSV")]
pub struct ExportArgs {
    /// Path to a Q-table saved by `train --output`
    pub table: PathBuf,

    /// Output CSV file
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

pub fn execute(args: ExportArgs) -> Result<()> {
    let saved = SavedQTable::load_from_file(&args.table)
        .with_context(|| format!("Failed to load Q-table from {}", args.table.display()))?;
    let rows = export_q_table_csv(&saved.table, &args.output)?;
    println!("Wrote {rows} rows to {}", args.output.display());
    Ok(())
}
