//! Configuration management for kox-lister.
//!
//! Handles loading, saving, and validating configuration from
//! platform-specific config directories.

use crate::error::ConfigError;
use crate::extract::{DEFAULT_ORIGIN, ExtractOptions, ParseMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application name used for config directory.
const APP_NAME: &str = "KoxLister";

/// Default config filename.
const CONFIG_FILENAME: &str = "config.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target site settings.
    pub site: SiteConfig,

    /// HTTP session settings.
    pub http: HttpConfig,

    /// Output behavior.
    pub output: OutputConfig,
}

/// Target site configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin the data feed path is resolved against.
    pub origin: String,

    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

/// HTTP session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    pub timeout_sec: u64,

    /// Delay before each request in seconds.
    pub delay_between_requests_sec: f64,

    /// Netscape cookie file exported from a logged-in browser session.
    pub cookie_file: Option<PathBuf>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_sec: 30,
            delay_between_requests_sec: 0.5,
            cookie_file: None,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Skip malformed volinfo lines instead of aborting.
    pub lenient: bool,

    /// Print results as JSON.
    pub json: bool,
}

impl Config {
    /// Returns the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Returns the full path to the config file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(CONFIG_FILENAME))
    }

    /// Loads configuration from the default location.
    ///
    /// If the config file doesn't exist, creates a default one.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Saves configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match url::Url::parse(&self.site.origin) {
            Ok(origin) if matches!(origin.scheme(), "http" | "https") => {}
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: "site.origin".to_string(),
                    message: format!("'{}' is not an absolute http(s) URL", self.site.origin),
                });
            }
        }

        if self.http.timeout_sec == 0 {
            return Err(ConfigError::InvalidValue {
                key: "http.timeout_sec".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        let delay = self.http.delay_between_requests_sec;
        if delay.is_nan() || delay < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "http.delay_between_requests_sec".to_string(),
                message: "must not be negative".to_string(),
            });
        }

        Ok(())
    }

    /// Builds the extraction options this configuration describes.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            origin: self.site.origin.trim_end_matches('/').to_string(),
            mode: if self.output.lenient {
                ParseMode::Lenient
            } else {
                ParseMode::Strict
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.site.origin, "https://kox.moe");
        assert_eq!(config.http.timeout_sec, 30);
        assert!(config.http.cookie_file.is_none());
        assert!(!config.output.lenient);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = Config::default();
        config.http.cookie_file = Some(PathBuf::from("/tmp/kox_cookies.txt"));
        config.output.json = true;
        let file = NamedTempFile::new().unwrap();

        config.save_to(file.path()).unwrap();

        let loaded = Config::load_from(file.path()).unwrap();
        assert_eq!(loaded.site.origin, config.site.origin);
        assert_eq!(loaded.http.cookie_file, config.http.cookie_file);
        assert!(loaded.output.json);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILENAME);

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.http.delay_between_requests_sec, 0.5);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[output]\nlenient = true\n").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert!(config.output.lenient);
        assert_eq!(config.site.origin, "https://kox.moe");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.site.origin = "kox.moe".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.http.timeout_sec = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.http.delay_between_requests_sec = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_extract_options() {
        let mut config = Config::default();
        config.site.origin = "https://mox.moe/".to_string();
        config.output.lenient = true;

        let options = config.extract_options();
        assert_eq!(options.origin, "https://mox.moe");
        assert_eq!(options.mode, ParseMode::Lenient);
    }
}
