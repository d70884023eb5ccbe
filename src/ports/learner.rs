//! Learner port - abstraction over action-selecting, updatable agents

use crate::{
    Result,
    environment::{Action, Position, Transition},
};

/// Learner trait - the interface the training pipeline drives
///
/// # Examples
///
/// ```no_run
/// use gridworld::{
///     environment::{Action, Position},
///     ports::Learner,
/// };
///
/// struct AlwaysRight;
///
/// impl Learner for AlwaysRight {
///     fn select_action(&mut self, _state: Position) -> Action {
///         Action::Right
///     }
///
///     fn name(&self) -> &str {
///         "always-right"
///     }
/// }
/// ```
pub trait Learner: Send {
    /// Choose the action to take from `state`.
    fn select_action(&mut self, state: Position) -> Action;

    /// Update the learner from one observed transition.
    ///
    /// Called once per step, immediately after the environment responds.
    /// The default implementation does nothing, suitable for fixed policies.
    fn learn(&mut self, _transition: &Transition) -> Result<()> {
        Ok(())
    }

    /// Get the learner's name.
    ///
    /// Used in logging and summaries.
    fn name(&self) -> &str;

    /// Seed the learner's internal random number generator.
    ///
    /// Training pipelines call this method when supplied with a deterministic
    /// seed. Learners without randomness can ignore it.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}
