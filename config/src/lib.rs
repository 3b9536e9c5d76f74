//! Configuration for catcher.
//!
//! The runner has a single knob: whether it may install its panic-hook gate.
//! Hosts either build a [`CatcherConfig`] in code, embed it in their own serde
//! config, or read the `[catcher]` table of a TOML file with
//! [`CatcherConfig::load`].
//!
//! ```toml
//! [catcher]
//! quiet_panics = false
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use toml::de::Error as TomlError;

// Default value function for serde (bool::default() is false, so only true needs a fn)
const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CatcherConfig {
    /// Skip the panic hook (message formatting and backtrace capture) for
    /// panics that a runner call is about to discard.
    ///
    /// When `false` the process panic hook is never touched and suppressed
    /// panics are still reported by it.
    #[serde(default = "default_true")]
    pub quiet_panics: bool,
}

impl Default for CatcherConfig {
    fn default() -> Self {
        Self { quiet_panics: true }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    catcher: Option<CatcherConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config at {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: TomlError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl CatcherConfig {
    /// Parse the `[catcher]` table out of a TOML document.
    ///
    /// Returns `Ok(None)` when the document has no such table.
    pub fn from_toml_str(content: &str) -> Result<Option<Self>, TomlError> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.catcher)
    }

    /// Load the `[catcher]` table from `path`.
    ///
    /// A missing file is not an error.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match Self::from_toml_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }
}
