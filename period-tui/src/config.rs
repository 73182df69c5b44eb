use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const API_URL_ENV: &str = "PERIOD_TUI_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodConfig {
    /// Base URL of the period tracking server, e.g. "http://127.0.0.1:8000"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Log file location; defaults to `period-tui.log` next to the config.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_api_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

impl Default for PeriodConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            log_file: None,
        }
    }
}

impl PeriodConfig {
    pub fn root_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("period-tui"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::root_dir()?.join("config.toml"))
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::root_dir()?.join("period-tui.log")),
        }
    }

    /// Load config from disk, then apply environment overrides. Returns the
    /// default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            Self::from_toml(&raw)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.apply_api_url_override(&url);
        }
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_api_url_override(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            self.api_url = url.to_string();
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(&path, raw)?;
        Ok(())
    }

    /// Return the config path, writing a default config first if none exists.
    pub fn ensure_exists() -> Result<PathBuf> {
        let path = Self::config_path()?;
        if !path.exists() {
            Self::default().save()?;
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = PeriodConfig::from_toml("").unwrap();
        assert_eq!(config, PeriodConfig::default());
        assert_eq!(config.api_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn reads_api_url_and_log_file() {
        let config = PeriodConfig::from_toml(
            "api_url = \"https://period.example.com\"\nlog_file = \"/tmp/period.log\"\n",
        )
        .unwrap();
        assert_eq!(config.api_url, "https://period.example.com");
        assert_eq!(config.log_path().unwrap(), PathBuf::from("/tmp/period.log"));
    }

    #[test]
    fn blank_override_keeps_configured_url() {
        let mut config = PeriodConfig::default();
        config.apply_api_url_override("   ");
        assert_eq!(config.api_url, "http://127.0.0.1:8000");
        config.apply_api_url_override("http://10.0.0.2:8000");
        assert_eq!(config.api_url, "http://10.0.0.2:8000");
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(PeriodConfig::from_toml("api_url = 3").is_err());
    }
}
