//! Centralized error types for the SkyView application.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-friendly messages suitable for notices
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// All errors surfaced to the user should be convertible to this type.
/// Use `user_message()` to get a notice-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    /// Service-level errors that can be mapped from UI crates.
    #[error("Service error: {0}")]
    Service(String),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in a notice.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Weather(e) => e.user_message(),
            AppError::Service(_) => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// Short title for the notice that reports this error.
    pub fn title(&self) -> &'static str {
        match self {
            AppError::Weather(WeatherError::EmptyAddress) => "Input Error",
            _ => "Error",
        }
    }
}

/// Network-related errors (HTTP, connectivity).
///
/// Kept for logs only; the user sees the notice of the failing operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Configuration errors. These reach `main` through `anyhow`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

/// Weather lookup errors, one per user-visible failure kind.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Address is empty")]
    EmptyAddress,

    #[error("Geocoding failed: {0}")]
    GeocodeFailed(String),

    #[error("Weather fetch failed: {0}")]
    FetchFailed(String),

    #[error("Favorite rejected: {0}")]
    FavoriteRejected(String),

    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("Invalid API key")]
    InvalidApiKey,
}

impl WeatherError {
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::EmptyAddress => "Please enter an address.".to_string(),
            WeatherError::GeocodeFailed(_) => "Failed to get geolocation.".to_string(),
            WeatherError::FetchFailed(_) => "Failed to get weather data.".to_string(),
            WeatherError::FavoriteRejected(_) => {
                "Location is already in favorites or no location selected.".to_string()
            }
            WeatherError::ExportFailed(e) => format!("Failed to save file: {}", e),
            WeatherError::InvalidApiKey => {
                format!("Weather API key is missing or invalid. Set {}.", crate::API_KEY_ENV)
            }
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors: Vec<AppError> = vec![
            WeatherError::InvalidApiKey.into(),
            WeatherError::EmptyAddress.into(),
            AppError::Service("boom".into()),
        ];

        for e in errors {
            assert!(!e.user_message().is_empty(), "empty message for {:?}", e);
        }
    }

    #[test]
    fn test_weather_notices_name_the_failing_operation() {
        assert_eq!(
            WeatherError::GeocodeFailed("x".into()).user_message(),
            "Failed to get geolocation."
        );
        assert_eq!(
            WeatherError::FetchFailed("x".into()).user_message(),
            "Failed to get weather data."
        );
        assert_eq!(
            WeatherError::ExportFailed("permission denied".into()).user_message(),
            "Failed to save file: permission denied"
        );
    }

    #[test]
    fn test_empty_address_uses_input_error_title() {
        let err = AppError::from(WeatherError::EmptyAddress);
        assert_eq!(err.title(), "Input Error");
        assert_eq!(err.user_message(), "Please enter an address.");

        let err = AppError::from(WeatherError::FetchFailed("x".into()));
        assert_eq!(err.title(), "Error");
    }
}
