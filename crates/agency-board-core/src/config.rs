use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{BoardError, BoardResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Gap left between consecutive card positions in a bucket.
    #[serde(default = "default_position_step")]
    pub position_step: i64,
    #[serde(default = "default_persistence_timeout_ms")]
    pub persistence_timeout_ms: u64,
    /// Maximum number of activity log entries a store keeps.
    #[serde(default = "default_activity_log_limit")]
    pub activity_log_limit: usize,
}

fn default_position_step() -> i64 {
    1024
}

fn default_persistence_timeout_ms() -> u64 {
    10_000
}

fn default_activity_log_limit() -> usize {
    200
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            position_step: default_position_step(),
            persistence_timeout_ms: default_persistence_timeout_ms(),
            activity_log_limit: default_activity_log_limit(),
        }
    }
}

impl BoardConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/agency-board/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("agency-board/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("agency-board\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Load from the per-user config file, falling back to defaults.
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                match Self::load_from(&config_path) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!(
                            "Ignoring config at {}: {}",
                            config_path.display(),
                            e
                        );
                    }
                }
            }
        }
        Self::default()
    }

    pub fn load_from(path: &Path) -> BoardResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| BoardError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BoardResult<()> {
        if self.position_step < 2 {
            return Err(BoardError::Validation(format!(
                "position_step must be at least 2, got {}",
                self.position_step
            )));
        }
        if self.persistence_timeout_ms == 0 {
            return Err(BoardError::Validation(
                "persistence_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn persistence_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.persistence_timeout_ms)
    }
}
