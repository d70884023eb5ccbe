//! Save/load support for trained Q-tables.
//!
//! Tables are stored as MessagePack together with the grid they were
//! trained on and the hyperparameters used.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    app::AgentConfig,
    environment::{Grid, GridConfig},
    pipeline::{TrainingConfig, TrainingResult},
    q_learning::q_table::QTable,
};

/// Metadata about the training process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Number of episodes trained
    pub episodes: Option<usize>,
    /// Episodes that reached the goal
    pub completed_episodes: Option<usize>,
    /// Learning rate α
    pub learning_rate: Option<f64>,
    /// Discount factor γ
    pub discount_factor: Option<f64>,
    /// Exploration rate ε
    pub epsilon: Option<f64>,
    /// Per-episode step cap
    pub max_steps_per_episode: Option<usize>,
    /// Random seed used (if any)
    pub seed: Option<u64>,
}

impl TrainingMetadata {
    pub fn from_run(agent: &AgentConfig, training: &TrainingConfig, result: &TrainingResult) -> Self {
        Self {
            episodes: Some(result.total_episodes),
            completed_episodes: Some(result.completed_episodes),
            learning_rate: Some(agent.learning_rate),
            discount_factor: Some(agent.discount_factor),
            epsilon: Some(agent.epsilon),
            max_steps_per_episode: training.max_steps_per_episode,
            seed: training.seed.or(agent.seed),
        }
    }
}

/// Serializable representation of a trained Q-table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQTable {
    /// Version of the save format
    pub version: u32,
    /// Grid the table was trained on
    pub grid: GridConfig,
    pub table: QTable,
    pub metadata: TrainingMetadata,
}

impl SavedQTable {
    /// Current save format version
    pub const VERSION: u32 = 1;

    pub fn new(grid: &Grid, table: QTable, metadata: TrainingMetadata) -> Result<Self> {
        table.check_size(grid.size())?;
        Ok(Self {
            version: Self::VERSION,
            grid: grid.config().clone(),
            table,
            metadata,
        })
    }

    /// Rebuild the grid this table was trained on
    pub fn grid(&self) -> Result<Grid> {
        Grid::from_config(&self.grid)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file =
            File::create(path).map_err(|e| Error::io(format!("create {}", path.display()), e))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self)?;
        writer.flush()?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).map_err(|e| Error::io(format!("open {}", path.display()), e))?;
        let reader = BufReader::new(file);

        let saved: Self = rmp_serde::decode::from_read(reader)?;
        saved.check()?;
        Ok(saved)
    }

    fn check(&self) -> Result<()> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        self.grid.validate()?;
        self.table.check_size(self.grid.size)
    }
}
