//! Application configuration management.
//!
//! This module handles loading and saving the application configuration
//! (currently the last used username), and resolves the API base address.
//!
//! Configuration is stored at `~/.config/deskline/config.json`. The API
//! base address comes from the `DESKLINE_API_URL` environment variable,
//! falling back to the local development server.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "deskline";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable holding the API base address
const API_URL_ENV: &str = "DESKLINE_API_URL";

/// Local development server, used when no base address is configured
const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Resolve the API base address. Called once at startup; the client keeps
/// the resolved value for its whole lifetime.
pub fn api_base_url() -> String {
    base_url_from(std::env::var(API_URL_ENV).ok())
}

/// An unset or empty value means "use the local development fallback".
fn base_url_from(configured: Option<String>) -> String {
    configured
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub last_username: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for session state (the persisted bearer token)
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
