//! Error types for the gridworld crate

use thiserror::Error;

/// Main error type for the gridworld crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("obstacle ({row}, {col}) lies outside a {size}x{size} grid")]
    ObstacleOutOfBounds { row: usize, col: usize, size: usize },

    #[error("invalid {name} {value} (expected {expected})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("position ({row}, {col}) lies outside a {size}x{size} grid")]
    PositionOutOfBounds { row: usize, col: usize, size: usize },

    #[error("Q-table covers a {table}x{table} grid but the grid is {grid}x{grid}")]
    TableSizeMismatch { table: usize, grid: usize },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to encode Q-table: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("failed to decode Q-table: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("unsupported save format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    pub(crate) fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }
}
