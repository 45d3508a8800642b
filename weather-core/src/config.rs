use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::Units;

/// Environment variable that overrides the API key from the config file.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

fn default_api_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_icon_base_url() -> String {
    "https://openweathermap.org/img/wn".to_string()
}

const fn default_timeout() -> u64 {
    10
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "metric"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// OpenWeather API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default)]
    pub units: Units,

    /// Base URL of the OpenWeather 2.5 API (`/weather` and `/forecast` live below it).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL for condition icons (`{icon_base_url}/{icon}.png`).
    #[serde(default = "default_icon_base_url")]
    pub icon_base_url: String,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            units: Units::default(),
            api_base_url: default_api_base_url(),
            icon_base_url: default_icon_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Config {
    /// Load config from disk and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let cfg = Self::load_from(&path)?;
        Ok(cfg.with_env_overrides(|name| std::env::var(name).ok()))
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Override file values with the environment, looked up through `lookup`.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-view", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns the API key, treating a blank one as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_openweather() {
        let cfg = Config::default();
        assert_eq!(cfg.api_key(), None);
        assert_eq!(cfg.units, Units::Metric);
        assert_eq!(cfg.api_base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(cfg.icon_base_url, "https://openweathermap.org/img/wn");
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.api_key = Some("   ".into());
        assert_eq!(cfg.api_key(), None);

        cfg.set_api_key(" KEY \n".into());
        assert_eq!(cfg.api_key(), Some("KEY"));
    }

    #[test]
    fn env_overrides_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FROM_FILE".into());

        let cfg = cfg.with_env_overrides(|name| {
            (name == API_KEY_ENV).then(|| "FROM_ENV".to_string())
        });
        assert_eq!(cfg.api_key(), Some("FROM_ENV"));
    }

    #[test]
    fn empty_env_does_not_clear_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FROM_FILE".into());

        let cfg = cfg.with_env_overrides(|_| Some(String::new()));
        assert_eq!(cfg.api_key(), Some("FROM_FILE"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("nope.toml")).expect("defaults");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("OPEN_KEY".into());
        cfg.units = Units::Standard;
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"K\"\n").expect("write");

        let cfg = Config::load_from(&path).expect("load");
        assert_eq!(cfg.api_key(), Some("K"));
        assert_eq!(cfg.units, Units::Metric);
        assert_eq!(cfg.timeout_secs, 10);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "units = [").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
