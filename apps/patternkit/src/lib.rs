//! # patternkit
//!
//! File-facing pieces of the `patternkit` tool: configuration loading and
//! the JSON notation for passables.

pub mod config;
pub mod notation;

use patternkit_core::PatternError;
use thiserror::Error;

/// Errors raised by the command-line tool.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("notation error: {0}")]
    Notation(String),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}
