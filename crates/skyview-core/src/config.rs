use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

use crate::error::ConfigError;

/// Environment variable holding the RapidAPI key shared by both services.
pub const API_KEY_ENV: &str = "SKYVIEW_RAPIDAPI_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn name(self) -> &'static str {
        match self {
            Self::Celsius => "Celsius",
            Self::Fahrenheit => "Fahrenheit",
        }
    }

    /// Single-letter suffix shown after the degree sign.
    pub fn suffix(self) -> char {
        match self {
            Self::Celsius => 'C',
            Self::Fahrenheit => 'F',
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemperatureUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "celsius" => Ok(Self::Celsius),
            "f" | "fahrenheit" => Ok(Self::Fahrenheit),
            other => Err(ConfigError::Invalid(format!(
                "unknown temperature unit '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Weather settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Upstream API endpoints
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Unit selected at startup
    #[serde(default)]
    pub default_unit: TemperatureUnit,

    /// Auto-refresh interval for the last viewed location, in seconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Per-request HTTP timeout, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_refresh_interval() -> u64 {
    600
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            default_unit: TemperatureUnit::Celsius,
            refresh_interval_secs: default_refresh_interval(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Geocoding and weather endpoints (RapidAPI-hosted).
///
/// The key itself is never written to the config file; see [`ApiConfig::api_key`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub geocode_base_url: String,
    pub geocode_host: String,
    pub weather_base_url: String,
    pub weather_host: String,

    #[serde(skip)]
    pub api_key_override: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            geocode_base_url: "https://map-geocoding.p.rapidapi.com".to_string(),
            geocode_host: "map-geocoding.p.rapidapi.com".to_string(),
            weather_base_url: "https://weatherapi-com.p.rapidapi.com".to_string(),
            weather_host: "weatherapi-com.p.rapidapi.com".to_string(),
            api_key_override: None,
        }
    }
}

impl ApiConfig {
    /// Point both services at one base URL (mock servers, proxies).
    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        Self {
            geocode_base_url: base_url.to_string(),
            weather_base_url: base_url.to_string(),
            api_key_override: Some(api_key.to_string()),
            ..Self::default()
        }
    }

    /// API key from the explicit override, else from the environment.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_override
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skyview");

        Self {
            config_dir,
            weather: WeatherConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, creating it with defaults if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let mut config = Self::default();
            if let Some(parent) = config_path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.api.geocode_base_url, "api.geocode_base_url", &mut result);
        self.validate_url(&self.api.weather_base_url, "api.weather_base_url", &mut result);

        if self.api.geocode_host.trim().is_empty() {
            result.add_error("api.geocode_host", "Host header must not be empty");
        }
        if self.api.weather_host.trim().is_empty() {
            result.add_error("api.weather_host", "Host header must not be empty");
        }

        if self.weather.refresh_interval_secs == 0 {
            result.add_warning(
                "weather.refresh_interval_secs",
                "Auto-refresh disabled (0 seconds)",
            );
        } else if self.weather.refresh_interval_secs > 86_400 {
            result.add_warning(
                "weather.refresh_interval_secs",
                "Auto-refresh interval is more than 24 hours",
            );
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        if self.api.api_key().is_none() {
            result.add_warning(
                "api.key",
                format!("{} is not set - lookups will be rejected", API_KEY_ENV),
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skyview");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_default_refresh_is_ten_minutes() {
        assert_eq!(WeatherConfig::default().refresh_interval_secs, 600);
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.api.weather_base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "api.weather_base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.api.geocode_base_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_timeout_is_error() {
        let mut config = Config::default();
        config.weather.request_timeout_secs = 0;
        let result = config.validate();
        assert!(!result.is_valid());
    }

    #[test]
    fn test_api_key_override_wins() {
        let api = ApiConfig::with_base_url("http://127.0.0.1:9", "abc");
        assert_eq!(api.api_key().as_deref(), Some("abc"));
        assert_eq!(api.weather_base_url, "http://127.0.0.1:9");
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("c".parse::<TemperatureUnit>().ok(), Some(TemperatureUnit::Celsius));
        assert_eq!(
            " Fahrenheit ".parse::<TemperatureUnit>().ok(),
            Some(TemperatureUnit::Fahrenheit)
        );
        assert!("kelvin".parse::<TemperatureUnit>().is_err());
        assert_eq!(TemperatureUnit::Fahrenheit.suffix(), 'F');
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.config_dir, dir.path());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.weather.refresh_interval_secs, 600);
        assert_eq!(reloaded.api.weather_host, "weatherapi-com.p.rapidapi.com");
    }

    #[test]
    fn test_load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
