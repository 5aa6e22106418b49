//! Shared plumbing for the two RapidAPI-hosted services.

use reqwest::Client;
use std::time::Duration;

use crate::types::WeatherError;

const USER_AGENT: &str = "SkyView/0.1.0";

pub(crate) const KEY_HEADER: &str = "x-rapidapi-key";
pub(crate) const HOST_HEADER: &str = "x-rapidapi-host";

pub(crate) fn build_client(timeout: Duration) -> Result<Client, WeatherError> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Read a response into JSON, mapping status and body problems to typed errors.
///
/// An empty body or a literal `null` becomes `EmptyResponse`; anything that is
/// not JSON becomes `MalformedResponse`.
pub(crate) async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, WeatherError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Upstream returned status {}: {}", status, body);
        return Err(WeatherError::Api {
            status: status.as_u16(),
            body,
        });
    }

    let text = response.text().await?;
    if text.trim().is_empty() {
        return Err(WeatherError::EmptyResponse);
    }

    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| WeatherError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    if value.is_null() {
        return Err(WeatherError::EmptyResponse);
    }

    Ok(value)
}
