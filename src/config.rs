//! Configuration management for the kitecast service
//!
//! Handles loading configuration from files and environment variables
//! and validates every setting before the server starts.

use crate::KitecastError;
use anyhow::{Context, Result};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure for the kitecast service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KitecastConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Weather provider settings
    pub weather: WeatherConfig,
    /// Observation cache settings
    pub cache: CacheConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Spot catalog settings
    pub spots: SpotsConfig,
}

/// HTTP server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

/// Weather provider configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Base URL for the Open-Meteo API
    pub base_url: String,
    /// Request timeout in seconds; on timeout the synthetic fallback is used
    pub timeout_seconds: u64,
    /// IANA time zone sent to the provider
    pub timezone: String,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Observation time-to-live in minutes
    pub ttl_minutes: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

/// Spot catalog configuration settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotsConfig {
    /// JSON catalog to load instead of the embedded one
    pub catalog_path: Option<String>,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u64 {
    8
}

fn default_timezone() -> String {
    "Europe/Amsterdam".to_string()
}

fn default_cache_ttl() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
            timezone: default_timezone(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_cache_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes * 60)
    }
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl KitecastConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. KITECAST_SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("KITECAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: KitecastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kitecast").join("config.toml"))
    }

    /// Replace empty or zero values with defaults
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timezone.is_empty() {
            self.weather.timezone = default_timezone();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.cache.ttl_minutes == 0 {
            self.cache.ttl_minutes = default_cache_ttl();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_paths()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(KitecastError::config("Server port cannot be 0").into());
        }

        if !(1..=60).contains(&self.weather.timeout_seconds) {
            return Err(KitecastError::config(
                "Weather API timeout must be between 1 and 60 seconds",
            )
            .into());
        }

        if !(1..=1440).contains(&self.cache.ttl_minutes) {
            return Err(KitecastError::config(
                "Cache TTL must be between 1 and 1440 minutes",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(KitecastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(KitecastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(KitecastError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if self.weather.timezone.parse::<Tz>().is_err() {
            return Err(KitecastError::config(format!(
                "Unknown time zone '{}'",
                self.weather.timezone
            ))
            .into());
        }

        Ok(())
    }

    fn validate_paths(&self) -> Result<()> {
        if let Some(path) = &self.spots.catalog_path {
            if !Path::new(path).is_file() {
                return Err(KitecastError::config(format!(
                    "Spot catalog file '{path}' does not exist"
                ))
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = KitecastConfig::default();
        assert_eq!(config.weather.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.weather.timeout_seconds, 8);
        assert_eq!(config.weather.timezone, "Europe/Amsterdam");
        assert_eq!(config.cache.ttl(), Duration::from_secs(600));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.server.address(), "0.0.0.0:3000");
        assert!(config.spots.catalog_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = KitecastConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = KitecastConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout must be"));
    }

    #[test]
    fn test_config_validation_time_zone() {
        let mut config = KitecastConfig::default();
        config.weather.timezone = "Europe/Atlantis".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Unknown time zone"));
    }

    #[test]
    fn test_config_validation_missing_catalog() {
        let mut config = KitecastConfig::default();
        config.spots.catalog_path = Some("/definitely/not/here.json".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults() {
        let mut config = KitecastConfig::default();
        config.cache.ttl_minutes = 0;
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.cache.ttl_minutes, 10);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[server]\nport = 8088\n\n[cache]\nttl_minutes = 5\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = KitecastConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.cache.ttl_minutes, 5);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.weather.timezone, "Europe/Amsterdam");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = KitecastConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("kitecast"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
