//! Reader configuration.
//!
//! All settings live in one [`Config`] value, loaded once and handed to the
//! components that need it. The reader receives its [`ReaderConfig`] through
//! its constructor and `set_config`, never from ambient state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::expand_tilde;

/// Library root used when none is configured.
pub const DEFAULT_ROOT_PATH: &str = "novels";

/// Window width used when none is configured.
pub const DEFAULT_SHOW_LENGTH: usize = 20;

/// Settings for the status-bar reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Maximum number of characters shown per window.
    pub show_length: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            show_length: DEFAULT_SHOW_LENGTH,
        }
    }
}

impl ReaderConfig {
    pub fn new(show_length: usize) -> Self {
        Self { show_length }
    }
}

/// Top-level configuration, stored as TOML.
///
/// ```toml
/// root_path = "~/novels"
///
/// [reader]
/// show_length = 20
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory (or single file) to load the library from.
    pub root_path: PathBuf,
    pub reader: ReaderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_path: PathBuf::from(DEFAULT_ROOT_PATH),
            reader: ReaderConfig::default(),
        }
    }
}

impl Config {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|source| Error::read(path, source))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.reader.show_length == 0 {
            return Err(Error::Config("show_length must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Root path with a leading `~/` expanded.
    pub fn resolved_root(&self) -> PathBuf {
        expand_tilde(&self.root_path)
    }

    pub fn with_root_path(mut self, root_path: impl Into<PathBuf>) -> Self {
        self.root_path = root_path.into();
        self
    }

    pub fn with_show_length(mut self, show_length: usize) -> Self {
        self.reader.show_length = show_length;
        self
    }
}
