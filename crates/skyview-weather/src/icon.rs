//! Condition icon download and decode.

use image::RgbaImage;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::http;
use crate::types::WeatherError;

/// Turn the provider's icon reference into a fetchable URL.
///
/// The weather service returns protocol-relative paths
/// (`//cdn.weatherapi.com/...`); those get an `http:` prefix. References that
/// already name a scheme are used unchanged.
pub fn icon_url(icon_ref: &str) -> String {
    let icon_ref = icon_ref.trim();
    if icon_ref.contains("://") {
        icon_ref.to_string()
    } else {
        format!("http:{}", icon_ref)
    }
}

/// Decode raw image bytes into an RGBA8 pixel buffer, keeping alpha.
pub fn decode_icon(bytes: &[u8]) -> Result<RgbaImage, WeatherError> {
    let img = image::load_from_memory(bytes).map_err(|e| WeatherError::Image(e.to_string()))?;
    Ok(img.to_rgba8())
}

#[derive(Debug, Clone)]
pub struct IconFetcher {
    client: Arc<Client>,
}

impl IconFetcher {
    pub fn new(timeout: Duration) -> Result<Self, WeatherError> {
        Ok(Self {
            client: Arc::new(http::build_client(timeout)?),
        })
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn fetch(&self, url: &str) -> Result<RgbaImage, WeatherError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Api {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        let bytes = response.bytes().await?;
        let img = decode_icon(&bytes)?;
        tracing::debug!("Decoded icon {}x{}", img.width(), img.height());
        Ok(img)
    }
}
