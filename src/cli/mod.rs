//! Command line interface module
//!
//! This module provides argument parsing and the runner that turns a parsed
//! command into calls on [`crate::HarborClient`].

pub mod args;
pub mod runner;

pub use args::{Args, Command, ProjectCommand, RepoCommand, TagCommand};
pub use runner::{CliError, Runner};
