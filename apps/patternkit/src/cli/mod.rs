//! # Pattern Kit CLI Module
//!
//! This module implements the CLI interface for the pattern kit.
//!
//! ## Available Commands
//!
//! - `check` - Match a specimen against a pattern
//! - `lint` - Validate a pattern
//! - `cover` - Print the rank cover of a pattern
//! - `kind` - Classify a value

mod commands;

use clap::{Parser, Subcommand};
use patternkit::CliError;
use patternkit::config::FileConfig;
use patternkit_core::PatternKit;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Pattern Kit - structural pattern matching over passable values.
///
/// Values and patterns are read from files in JSON notation.
#[derive(Parser, Debug)]
#[command(name = "patternkit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML configuration file (default: patternkit.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Match a specimen against a pattern
    Check {
        /// Pattern file
        #[arg(short, long)]
        pattern: PathBuf,

        /// Specimen file
        #[arg(short, long)]
        specimen: PathBuf,

        /// Label prefixed to the diagnostic
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Report whether a value is a valid pattern
    Lint {
        /// Pattern file
        #[arg(short, long)]
        pattern: PathBuf,
    },

    /// Print the rank cover of a pattern
    Cover {
        /// Pattern file
        #[arg(short, long)]
        pattern: PathBuf,
    },

    /// Print the kind of a value
    Kind {
        /// Value file
        #[arg(short = 'i', long)]
        value: PathBuf,
    },
}

/// How a command ended, when it ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The value was accepted.
    Accepted,
    /// The value was rejected; the diagnostic has been printed.
    Rejected,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<Outcome, CliError> {
    let config = FileConfig::load(cli.config.as_deref())?;
    let kit = PatternKit::new(config.kit);
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Check { pattern, specimen, label } => {
            cmd_check(&kit, json_mode, &pattern, &specimen, label.as_deref())
        }
        Commands::Lint { pattern } => cmd_lint(&kit, json_mode, &pattern),
        Commands::Cover { pattern } => cmd_cover(&kit, json_mode, &pattern),
        Commands::Kind { value } => cmd_kind(&kit, json_mode, &value),
    }
}
