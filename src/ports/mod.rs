//! Ports (trait boundaries) between the training loop and its collaborators.
//!
//! The pipeline drives any [`Learner`] through episodes and reports every
//! event to a list of [`Observer`]s, without knowing how either is implemented.

pub mod learner;
pub mod observer;

pub use learner::Learner;
pub use observer::Observer;
