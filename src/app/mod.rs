//! Application-level configuration.
//!
//! Builder-style configuration types that the CLI fills from flags and the
//! library validates before any training starts.
//!
//! ```
//! use gridworld::app::AgentConfig;
//!
//! let config = AgentConfig::default()
//!     .with_learning_rate(0.5)
//!     .with_seed(42);
//! config.validate()?;
//! # Ok::<(), gridworld::Error>(())
//! ```

pub mod config;

pub use config::AgentConfig;
