//! # Configuration
//!
//! Optional TOML file with a `[kit]` table:
//!
//! ```toml
//! [kit]
//! max_depth = 64
//!
//! [kit.limits]
//! stringLengthLimit = 1000
//! ```

use crate::CliError;
use patternkit_core::KitConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "patternkit.toml";

/// Tool configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub kit: KitConfig,
}

impl FileConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `patternkit.toml` in the
    /// working directory is read if present, else defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let (config_path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !config_path.exists() {
            if required {
                return Err(CliError::Config(format!("{} not found", config_path.display())));
            }
            return Ok(Self::default());
        }

        tracing::debug!("Loading configuration from {:?}", config_path);
        let contents = std::fs::read_to_string(&config_path)
            .map_err(|e| CliError::Io(format!("Cannot read {}: {}", config_path.display(), e)))?;
        Self::parse(&contents)
    }

    /// Parse configuration text.
    pub fn parse(contents: &str) -> Result<Self, CliError> {
        toml::from_str(contents).map_err(|e| CliError::Config(e.to_string()))
    }
}
