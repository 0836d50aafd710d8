//! Configuration storage

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Compiled-in default for the listing service base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Environment variable that overrides the configured base URL.
pub const API_URL_ENV: &str = "RESPIO_API_URL";

/// Application configuration
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listing service base URL (falls back to [`DEFAULT_API_URL`])
    pub api_url: Option<String>,
    /// Local agent id, used as `senderId` on outgoing messages
    pub agent_id: i64,
    /// Display name for the local agent
    pub agent_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            agent_id: 1,
            agent_name: "John Doe".to_string(),
        }
    }
}

impl Config {
    /// Get config directory path
    fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "respio-cli", "respio-cli")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Effective base URL: environment override first, then the config
    /// file, then the compiled-in default.
    pub fn api_url(&self) -> String {
        std::env::var(API_URL_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }
}
