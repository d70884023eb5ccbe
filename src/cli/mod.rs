//! CLI infrastructure for the gridworld toolkit
//!
//! This module provides the command-line interface for training agents,
//! replaying saved tables and exporting learned values.

pub mod commands;
pub mod config;
pub mod output;
