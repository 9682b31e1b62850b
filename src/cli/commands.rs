//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DEFAULT_TIMEOUT_SECS, ENV_API_KEY, ENV_URL};

/// album-share - Export and synchronize album sharing permissions.
#[derive(Parser, Debug)]
#[command(name = "album-share")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Connection flags shared by every command.
#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    /// Photo service URL (https is assumed when no scheme is given).
    #[arg(long, env = ENV_URL)]
    pub url: String,

    /// API key for the photo service.
    #[arg(long, env = ENV_API_KEY, hide_env_values = true)]
    pub api_key: String,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export every album and its sharing state to a table.
    ListAll {
        /// Connection settings.
        #[command(flatten)]
        remote: RemoteArgs,

        /// Output file (defaults to albums_YYYYMMDD_HHMMSS.csv).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply the sharing permissions listed in a table.
    ShareAlbums {
        /// Connection settings.
        #[command(flatten)]
        remote: RemoteArgs,

        /// Table to apply.
        #[arg(short, long)]
        input: PathBuf,

        /// Show what would change without applying it.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
