use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::HibariError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub anilist: AniListConfig,
    pub search: SearchConfig,
}

/// OAuth application credentials and endpoints for AniList.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AniListConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub per_page: u32,
}

impl AppConfig {
    /// Load config: user file (if it exists) over built-in defaults.
    pub fn load() -> Result<Self, HibariError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            let user_str = std::fs::read_to_string(&user_path)
                .map_err(|e| HibariError::Config(e.to_string()))?;
            toml::from_str(&user_str).map_err(|e| HibariError::Config(e.to_string()))
        } else {
            toml::from_str(DEFAULT_CONFIG).map_err(|e| HibariError::Config(e.to_string()))
        }
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), HibariError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| HibariError::Config(e.to_string()))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Path to the user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path to the credential database.
    pub fn db_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().join("hibari.db"))
            .unwrap_or_else(|| PathBuf::from("hibari.db"))
    }

    /// Ensure the data directory exists and return the DB path.
    pub fn ensure_db_path() -> Result<PathBuf, HibariError> {
        let path = Self::db_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "hibari")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.search.per_page, 10);
        assert!(config.anilist.redirect_uri.starts_with("http://localhost:"));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = AppConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let reparsed: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(reparsed.anilist.client_id, config.anilist.client_id);
        assert_eq!(reparsed.search.per_page, config.search.per_page);
    }
}
