//! Parsing helpers shared across CLI commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::environment::Position;

/// Parse an obstacle list such as `2,2;3,3;4,4`.
///
/// An empty string yields no obstacles.
pub fn parse_obstacles(value: &str) -> Result<Vec<Position>> {
    value
        .split(';')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(|cell| {
            let (row, col) = cell
                .split_once(',')
                .ok_or_else(|| anyhow!("Invalid obstacle '{cell}' (expected 'row,col')"))?;
            let row = row
                .trim()
                .parse()
                .with_context(|| format!("Invalid obstacle row in '{cell}'"))?;
            let col = col
                .trim()
                .parse()
                .with_context(|| format!("Invalid obstacle column in '{cell}'"))?;
            Ok(Position::new(row, col))
        })
        .collect()
}

/// Resolve a `--summary` argument to a JSON file path.
///
/// A trailing separator or missing file name means a directory, which gets
/// `training_summary.json`; any other extension is replaced with `.json`.
pub fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}
