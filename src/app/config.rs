//! Configuration types for agent creation.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default learning rate α
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
/// Default discount factor γ
pub const DEFAULT_DISCOUNT_FACTOR: f64 = 0.9;
/// Default exploration rate ε
pub const DEFAULT_EPSILON: f64 = 0.1;

/// Configuration for creating a Q-learning agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Learning rate α, in (0, 1]
    pub learning_rate: f64,
    /// Discount factor γ, in (0, 1]
    pub discount_factor: f64,
    /// Exploration rate ε, in [0, 1]
    pub epsilon: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Create a configuration with explicit hyperparameters and no seed.
    pub fn new(learning_rate: f64, discount_factor: f64, epsilon: f64) -> Self {
        Self {
            learning_rate,
            discount_factor,
            epsilon,
            seed: None,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject hyperparameters outside their valid ranges.
    pub fn validate(&self) -> Result<()> {
        check_unit_open(self.learning_rate, "learning rate")?;
        check_unit_open(self.discount_factor, "discount factor")?;
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                value: self.epsilon,
                expected: "a value in [0, 1]",
            });
        }
        Ok(())
    }
}

fn check_unit_open(value: f64, name: &'static str) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            expected: "a value in (0, 1]",
        })
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LEARNING_RATE, DEFAULT_DISCOUNT_FACTOR, DEFAULT_EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AgentConfig::default();
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.discount_factor, 0.9);
        assert_eq!(config.epsilon, 0.1);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_range_checks() {
        assert!(AgentConfig::default().with_learning_rate(0.0).validate().is_err());
        assert!(AgentConfig::default().with_learning_rate(1.0).validate().is_ok());
        assert!(AgentConfig::default().with_discount_factor(1.5).validate().is_err());
        assert!(AgentConfig::default().with_epsilon(0.0).validate().is_ok());
        assert!(AgentConfig::default().with_epsilon(1.0).validate().is_ok());
        assert!(AgentConfig::default().with_epsilon(-0.1).validate().is_err());
        assert!(AgentConfig::default().with_epsilon(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_error_names_parameter() {
        let err = AgentConfig::default()
            .with_discount_factor(0.0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("discount factor"));
    }
}
