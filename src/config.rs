//! Level configuration
//!
//! Loads generation settings from a RON file, with fallback to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::generation::{CaveParams, ChamberParams, DungeonParams, LakeParams, LevelStyle};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to write config: {0}")]
    Serialize(#[from] ron::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything needed to build a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub width: i32,
    pub height: i32,
    pub style: LevelStyle,
    /// Fixed seed; a fresh one is drawn when absent
    pub seed: Option<u64>,
    pub caves: CaveParams,
    pub dungeon: DungeonParams,
    pub lakes: LakeParams,
    pub chambers: ChamberParams,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 45,
            style: LevelStyle::default(),
            seed: None,
            caves: CaveParams::default(),
            dungeon: DungeonParams::default(),
            lakes: LakeParams::default(),
            chambers: ChamberParams::default(),
        }
    }
}

impl LevelConfig {
    /// Parse a RON document. Missing fields keep their defaults.
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        let config: LevelConfig = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Two stairs need two interior cells
        if self.width < 3 || self.height < 3 || (self.width - 2) * (self.height - 2) < 2 {
            return Err(ConfigError::Invalid(format!(
                "map {}x{} has no room for two stairs",
                self.width, self.height
            )));
        }
        if self.chambers.min_radius < 0 || self.chambers.min_radius > self.chambers.max_radius {
            return Err(ConfigError::Invalid(format!(
                "chamber radius range {}..={} is empty",
                self.chambers.min_radius, self.chambers.max_radius
            )));
        }
        Ok(())
    }
}

/// Load a config file
pub fn load_config(path: &Path) -> Result<LevelConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    LevelConfig::from_ron(&content)
}

/// Load a config file, falling back to defaults when it is missing or broken
pub fn load_or_default(path: &Path) -> LevelConfig {
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return LevelConfig::default();
    }

    match load_config(path) {
        Ok(config) => {
            log::info!("loaded config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("{}: {}. Using defaults.", path.display(), e);
            LevelConfig::default()
        }
    }
}

/// Where the config lives when no path is given
pub fn default_config_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "gloomgrid", "Gloomgrid") {
        let mut path = proj_dirs.config_dir().to_path_buf();
        path.push("level.ron");
        path
    } else {
        PathBuf::from("./level.ron")
    }
}
