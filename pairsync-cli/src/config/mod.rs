//! Process-wide configuration
//!
//! Settings come from a TOML file with environment overrides, get installed
//! into a set-once cell at startup, and are never mutated afterwards. Every
//! later access goes through [`global()`].

use std::path::PathBuf;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::new();

const BASE_URL_ENV: &str = "PAIRSYNC_BASE_URL";
const TOKEN_ENV: &str = "PAIRSYNC_TOKEN";

/// Connection settings for the bridge endpoints
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote addon surface
    pub base_url: String,
    /// Bearer credential attached to every request
    pub token: String,
}

/// On-disk shape of the config file; both fields may come from elsewhere
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    token: Option<String>,
}

impl Config {
    /// Load settings from the config file and environment
    ///
    /// `PAIRSYNC_BASE_URL` and `PAIRSYNC_TOKEN` override file values; either
    /// source alone is enough as long as both fields end up set.
    pub fn load() -> Result<Self> {
        let file = match config_file_path() {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?
            }
            _ => FileConfig::default(),
        };

        Self::resolve(
            file,
            std::env::var(BASE_URL_ENV).ok(),
            std::env::var(TOKEN_ENV).ok(),
        )
    }

    /// Merge file values with environment overrides
    fn resolve(
        file: FileConfig,
        env_base_url: Option<String>,
        env_token: Option<String>,
    ) -> Result<Self> {
        let base_url = env_base_url
            .or(file.base_url)
            .with_context(|| format!("Missing base URL (set base_url in the config file or {BASE_URL_ENV})"))?;
        let token = env_token
            .or(file.token)
            .with_context(|| format!("Missing API token (set token in the config file or {TOKEN_ENV})"))?;

        Ok(Config { base_url, token })
    }
}

/// Where the config file lives on this platform
fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pairsync").join("config.toml"))
}

/// Install the configuration for the rest of the process
///
/// Callable exactly once, from startup; later calls are rejected so nothing
/// can swap the credential mid-run.
pub fn install(config: Config) -> Result<()> {
    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Configuration was already installed"))
}

/// Get the installed process configuration
///
/// Panics if called before [`install`]; startup installs it before any
/// command runs.
pub fn global() -> &'static Config {
    CONFIG
        .get()
        .expect("configuration accessed before installation")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_values_used_without_overrides() {
        let file: FileConfig =
            toml::from_str("base_url = \"http://localhost:5000\"\ntoken = \"abc\"").unwrap();

        let config = Config::resolve(file, None, None).unwrap();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.token, "abc");
    }

    #[test]
    fn test_env_overrides_file() {
        let file: FileConfig =
            toml::from_str("base_url = \"http://file\"\ntoken = \"file-token\"").unwrap();

        let config = Config::resolve(
            file,
            Some("http://env".to_string()),
            Some("env-token".to_string()),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://env");
        assert_eq!(config.token, "env-token");
    }

    #[test]
    fn test_missing_fields_are_reported() {
        let err = Config::resolve(FileConfig::default(), None, None).unwrap_err();
        assert!(err.to_string().contains("base URL"));

        let err = Config::resolve(
            FileConfig::default(),
            Some("http://env".to_string()),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn test_partial_file_is_valid_toml() {
        let file: FileConfig = toml::from_str("base_url = \"http://only\"").unwrap();
        assert_eq!(file.base_url.as_deref(), Some("http://only"));
        assert_eq!(file.token, None);
    }
}
