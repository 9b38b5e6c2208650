//! TOML-based application configuration.
//!
//! Stores the global gacha table plus per-group overrides:
//!
//! ```toml
//! [gacha]
//! base_max = 30
//!
//! [groups.12345]
//! base_max = 10
//! ```
//!
//! A group's table overrides the global one wholesale -- there is no
//! field-level merging. Configuration is stored at
//! `~/.config/muteroll/config.toml`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gacha::GachaConfig;

use super::data_dir;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Global gacha settings.
    #[serde(default)]
    pub gacha: GachaConfig,
    /// Per-group overrides, keyed by group id.
    #[serde(default)]
    pub groups: HashMap<String, GachaConfig>,
}

impl Config {
    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Effective gacha table for a group: its override when present, the
    /// global table otherwise.
    pub fn effective(&self, group_id: &str) -> &GachaConfig {
        self.groups.get(group_id).unwrap_or(&self.gacha)
    }

    /// Install or replace a group override.
    pub fn set_group(&mut self, group_id: &str, config: GachaConfig) {
        self.groups.insert(group_id.to_string(), config);
    }

    /// Drop a group override, falling back to the global table.
    pub fn reset_group(&mut self, group_id: &str) -> bool {
        self.groups.remove(group_id).is_some()
    }

    fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::DataDir(e.to_string()))?;
        Ok(dir.join("config.toml"))
    }
}
