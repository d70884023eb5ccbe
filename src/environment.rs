//! Grid navigation environment
//!
//! A square reward surface, the four-move action space and the deterministic
//! transition function that clamps moves at the grid border.

pub mod action;
pub mod grid;
pub mod position;
pub mod transition;

pub use action::Action;
pub use grid::{Grid, GridConfig};
pub use position::Position;
pub use transition::{Transition, step};
