use reqwest::Client;
use skyview_core::ApiConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::http::{self, HOST_HEADER, KEY_HEADER};
use crate::types::{Coordinates, ForecastPayload, WeatherError};

/// Number of forecast days requested.
pub const FORECAST_DAYS: u32 = 7;

/// Client for the weatherapi.com forecast endpoint.
///
/// The response always carries both unit systems, so the request does not
/// depend on the user's unit preference.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    host: String,
    api_key: Option<String>,
}

impl WeatherProvider {
    pub fn new(api: &ApiConfig, timeout: Duration) -> Result<Self, WeatherError> {
        Ok(Self {
            client: Arc::new(http::build_client(timeout)?),
            base_url: api.weather_base_url.trim_end_matches('/').to_string(),
            host: api.weather_host.clone(),
            api_key: api.api_key(),
        })
    }

    /// Fetch current conditions and the 7-day forecast for `coords`.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(&self, coords: Coordinates) -> Result<ForecastPayload, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;

        let url = format!("{}/forecast.json", self.base_url);
        let days = FORECAST_DAYS.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", coords.to_query().as_str()),
                ("days", days.as_str()),
                ("aqi", "no"),
                ("alerts", "no"),
            ])
            .header(KEY_HEADER, api_key)
            .header(HOST_HEADER, &self.host)
            .send()
            .await?;

        let value = http::read_json(response).await?;
        let payload: ForecastPayload = serde_json::from_value(value)
            .map_err(|e| WeatherError::MalformedResponse(format!("forecast: {}", e)))?;

        tracing::info!(
            "Fetched forecast for {}, {} ({} days)",
            payload.location.name,
            payload.location.country,
            payload.forecast.forecastday.len()
        );
        Ok(payload)
    }
}
