//! Project configuration stored in `.weave/config.json`.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! Command-line flags override whatever the file says.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use weave_graph::IntegrityPolicy;

/// Directory holding Weave's per-project state.
pub const WEAVE_DIR: &str = ".weave";

const CONFIG_FILE: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Built-in conflict policy selectable from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Fail when graphs disagree on a shared id.
    #[default]
    Consistent,
    /// Later graphs win on a shared id.
    Arbitrary,
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Consistent => write!(f, "consistent"),
            Self::Arbitrary => write!(f, "arbitrary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub policy: PolicyKind,

    #[serde(default)]
    pub integrity: IntegrityPolicy,

    /// Snapshot database, relative to the project root.
    #[serde(default = "default_store")]
    pub store: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            policy: PolicyKind::default(),
            integrity: IntegrityPolicy::default(),
            store: default_store(),
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_store() -> PathBuf {
    PathBuf::from(WEAVE_DIR).join("snapshots")
}

impl Config {
    /// Path of the config file under `root`.
    pub fn path(root: &Path) -> PathBuf {
        root.join(WEAVE_DIR).join(CONFIG_FILE)
    }

    /// Loads the config under `root`, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = Self::path(root);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        serde_json::from_str(&text).map_err(|source| ConfigError::Json { path, source })
    }

    /// Snapshot store location resolved against `root`.
    pub fn store_path(&self, root: &Path) -> PathBuf {
        root.join(&self.store)
    }
}
