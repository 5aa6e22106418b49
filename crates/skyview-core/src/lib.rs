pub mod config;
pub mod error;
pub mod lookup_state;

pub use config::{ApiConfig, Config, TemperatureUnit, WeatherConfig, API_KEY_ENV};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt, WeatherError};
pub use lookup_state::LookupState;

use anyhow::Result;

/// Environment variable consulted before `RUST_LOG` for the log filter.
pub const LOG_ENV: &str = "SKYVIEW_LOG";

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // stdout belongs to the shell; keep log lines on stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("SkyView core initialized");
    Ok(())
}
