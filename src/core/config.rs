use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            base_url: "http://localhost:8080/api".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LeaderboardConfig {
    /// Default window when the CLI flag is omitted: week, month or year.
    #[serde(default = "default_period")]
    pub period: String,
    /// Maximum number of ranked entries returned.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_period() -> String {
    "month".to_string()
}

fn default_limit() -> usize {
    50
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        LeaderboardConfig {
            period: default_period(),
            limit: default_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "fairway")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
