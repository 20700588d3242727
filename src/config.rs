//! Configuration management for the weather dashboard
//!
//! Handles loading configuration from defaults, an optional TOML file and
//! environment variables, and validates the result.

use crate::DashboardError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Prefix for environment overrides, e.g. `WEATHER_DASHBOARD_SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "WEATHER_DASHBOARD";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// External service endpoints and request limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Open-Meteo geocoding API base URL
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// Open-Meteo forecast API base URL
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Open-Meteo air-quality API base URL
    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,
    /// BigDataCloud base URL, first reverse-geocoding strategy
    #[serde(default = "default_reverse_primary_url")]
    pub reverse_primary_url: String,
    /// Nominatim base URL, second reverse-geocoding strategy
    #[serde(default = "default_reverse_secondary_url")]
    pub reverse_secondary_url: String,
    /// Client identifier sent with every request (Nominatim requires one)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Timeout for forecast, air-quality and geocoding calls
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Timeout for each reverse-geocoding call
    #[serde(default = "default_reverse_timeout")]
    pub reverse_timeout_seconds: u64,
}

/// City autocomplete settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,
    #[serde(default = "default_search_max_limit")]
    pub max_limit: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_air_quality_url() -> String {
    "https://air-quality-api.open-meteo.com/v1".to_string()
}

fn default_reverse_primary_url() -> String {
    "https://api.bigdatacloud.net/data".to_string()
}

fn default_reverse_secondary_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    format!("WeatherDashboard/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout() -> u64 {
    10
}

fn default_reverse_timeout() -> u64 {
    5
}

fn default_search_limit() -> usize {
    10
}

fn default_search_max_limit() -> usize {
    50
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

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            air_quality_url: default_air_quality_url(),
            reverse_primary_url: default_reverse_primary_url(),
            reverse_secondary_url: default_reverse_secondary_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
            reverse_timeout_seconds: default_reverse_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
            max_limit: default_search_max_limit(),
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

impl UpstreamConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    #[must_use]
    pub fn reverse_timeout(&self) -> Duration {
        Duration::from_secs(self.reverse_timeout_seconds)
    }
}

impl DashboardConfig {
    /// Load configuration, layering an optional TOML file and the environment over defaults
    pub fn load_from_path(config_path: Option<&Path>) -> Result<Self> {
        let defaults = Config::try_from(&DashboardConfig::default())
            .context("Failed to serialize default configuration")?;

        let mut builder = Config::builder().add_source(defaults);

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(DashboardError::config(format!(
                    "Config file not found: {}",
                    path.display()
                ))
                .into());
            }
            builder = builder.add_source(
                File::from(path.to_path_buf())
                    .required(true)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .context("Failed to build configuration")?;

        let config: DashboardConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_urls()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        let urls = [
            ("geocoding_url", &self.upstream.geocoding_url),
            ("forecast_url", &self.upstream.forecast_url),
            ("air_quality_url", &self.upstream.air_quality_url),
            ("reverse_primary_url", &self.upstream.reverse_primary_url),
            ("reverse_secondary_url", &self.upstream.reverse_secondary_url),
        ];

        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(DashboardError::config(format!(
                    "upstream.{name} must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }

        if self.upstream.user_agent.trim().is_empty() {
            return Err(DashboardError::config("upstream.user_agent cannot be empty").into());
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.upstream.timeout_seconds == 0 || self.upstream.timeout_seconds > 120 {
            return Err(DashboardError::config(
                "Upstream timeout must be between 1 and 120 seconds",
            )
            .into());
        }

        if self.upstream.reverse_timeout_seconds == 0 || self.upstream.reverse_timeout_seconds > 60
        {
            return Err(DashboardError::config(
                "Reverse geocoding timeout must be between 1 and 60 seconds",
            )
            .into());
        }

        if self.search.max_limit == 0 || self.search.max_limit > 50 {
            return Err(DashboardError::config("Search max_limit must be between 1 and 50").into());
        }

        if self.search.default_limit == 0 || self.search.default_limit > self.search.max_limit {
            return Err(DashboardError::config(
                "Search default_limit must be between 1 and max_limit",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DashboardError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DashboardError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.upstream.forecast_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.upstream.reverse_timeout(), Duration::from_secs(5));
        assert_eq!(config.search.default_limit, 10);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[upstream]
forecast_url = "http://localhost:9000/v1"

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = DashboardConfig::load_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.upstream.forecast_url, "http://localhost:9000/v1");
        assert_eq!(config.upstream.geocoding_url, default_geocoding_url());
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let result = DashboardConfig::load_from_path(Some(Path::new("/nonexistent/dashboard.toml")));
        assert!(result.unwrap_err().to_string().contains("Config file not found"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = DashboardConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_invalid_url() {
        let mut config = DashboardConfig::default();
        config.upstream.reverse_secondary_url = "nominatim.openstreetmap.org".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("reverse_secondary_url"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = DashboardConfig::default();
        config.upstream.reverse_timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.search.default_limit = 60;
        assert!(config.validate().is_err());
    }
}
