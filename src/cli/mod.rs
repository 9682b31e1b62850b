//! CLI module for the album sharing tool.
//!
//! This module provides the command-line interface for exporting and
//! applying album sharing permissions.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat, RemoteArgs};
pub use output::OutputFormatter;
