//! # patternkit
//!
//! Command-line front end for the pattern kit.
//!
//! ## Usage
//!
//! ```bash
//! # Match a specimen against a pattern
//! patternkit check --pattern pattern.json --specimen value.json
//!
//! # Validate a pattern, print its rank cover, classify a value
//! patternkit lint --pattern pattern.json
//! patternkit cover --pattern pattern.json
//! patternkit kind --value value.json
//! ```
//!
//! Exit status is 0 when the value is accepted, 1 when it is rejected, and
//! 2 on any other error.

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // PATTERNKIT_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("PATTERNKIT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let default_filter = if cli.verbose { "patternkit=debug" } else { "patternkit=info" };
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    match cli::execute(cli) {
        Ok(cli::Outcome::Accepted) => {}
        Ok(cli::Outcome::Rejected) => std::process::exit(1),
        Err(e) => {
            tracing::error!("Error: {}", e);
            std::process::exit(2);
        }
    }
}
