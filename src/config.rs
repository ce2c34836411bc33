//! # Configuration
//!
//! Settings can come from an optional JSON file. Command-line flags take
//! precedence over the file, and the file over the defaults in
//! [`paths`](crate::paths).
//!
//! ```json
//! {
//!     "root": "/data/actor_lines",
//!     "english_marker": "english",
//!     "search_pattern": "***"
//! }
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::paths::{DEFAULT_ENGLISH_MARKER, DEFAULT_ROOT_DIRECTORY, DEFAULT_SEARCH_PATTERN};

/// Errors that occur when the configuration file is loaded.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read '{path}': {error}")]
    IoRead {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// Failed to deserialize the configuration file.
    #[error("Failed to deserialize '{path}': {error}")]
    Deserialize {
        /// The configuration file.
        path: PathBuf,
        /// The underlying deserialization error.
        #[source]
        error: serde_json::Error,
    },
}

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the actor-lines tree.
    pub root: PathBuf,
    /// Prefix marking English actor directories.
    pub english_marker: String,
    /// Literal searched for when `search` is given no pattern.
    pub search_pattern: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT_DIRECTORY),
            english_marker: DEFAULT_ENGLISH_MARKER.to_string(),
            search_pattern: DEFAULT_SEARCH_PATTERN.to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration, falling back to defaults without a file.
    ///
    /// Unlike an absent `--config`, a given path that cannot be read is an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path).map_err(|error| ConfigError::IoRead {
            path: path.to_path_buf(),
            error,
        })?;
        serde_json::from_str(&raw).map_err(|error| ConfigError::Deserialize {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Returns `root` if given, otherwise the configured root.
    pub fn root_or(&self, root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(|| self.root.clone())
    }
}
