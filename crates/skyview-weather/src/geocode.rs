//! Forward geocoding: convert a free-text address into coordinates.
//! Uses the RapidAPI "map-geocoding" service (Google-style response shape).

use reqwest::Client;
use serde::Deserialize;
use skyview_core::ApiConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::http::{self, HOST_HEADER, KEY_HEADER};
use crate::types::{Coordinates, WeatherError};

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: Arc<Client>,
    base_url: String,
    host: String,
    api_key: Option<String>,
}

impl GeocodeClient {
    pub fn new(api: &ApiConfig, timeout: Duration) -> Result<Self, WeatherError> {
        Ok(Self {
            client: Arc::new(http::build_client(timeout)?),
            base_url: api.geocode_base_url.trim_end_matches('/').to_string(),
            host: api.geocode_host.clone(),
            api_key: api.api_key(),
        })
    }

    /// Resolve an address to the best-match coordinates.
    ///
    /// Returns `Ok(None)` when the service answers but has no match (empty or
    /// missing `results`, or a JSON `null` body).
    #[instrument(skip(self), level = "info")]
    pub async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, WeatherError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(WeatherError::EmptyAddress);
        }
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;

        let url = format!("{}/json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("address", address)])
            .header(KEY_HEADER, api_key)
            .header(HOST_HEADER, &self.host)
            .send()
            .await?;

        let value = match http::read_json(response).await {
            Ok(v) => v,
            Err(WeatherError::EmptyResponse) => {
                tracing::debug!("Geocode returned an empty body");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let body: GeocodeResponse = serde_json::from_value(value)
            .map_err(|e| WeatherError::MalformedResponse(format!("geocode: {}", e)))?;

        let coords = body.results.into_iter().next().map(|r| {
            Coordinates::new(r.geometry.location.lat, r.geometry.location.lng)
        });

        match &coords {
            Some(c) => tracing::info!("Geocoded to {}, {}", c.latitude, c.longitude),
            None => tracing::info!("Geocode returned no results"),
        }
        Ok(coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GeocodeClient {
        let api = ApiConfig::with_base_url(&server.uri(), "test-key");
        GeocodeClient::new(&api, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_geocode_returns_first_result() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json"))
            .and(query_param("address", "1600 Amphitheatre Parkway"))
            .and(header("x-rapidapi-key", "test-key"))
            .and(header("x-rapidapi-host", "map-geocoding.p.rapidapi.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {"geometry": {"location": {"lat": 37.42, "lng": -122.08}}},
                    {"geometry": {"location": {"lat": 1.0, "lng": 2.0}}}
                ],
                "status": "OK"
            })))
            .mount(&mock_server)
            .await;

        let coords = client_for(&mock_server)
            .geocode("1600 Amphitheatre Parkway")
            .await
            .unwrap();

        assert_eq!(coords, Some(Coordinates::new(37.42, -122.08)));
    }

    #[tokio::test]
    async fn test_geocode_empty_results_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [],
                "status": "ZERO_RESULTS"
            })))
            .mount(&mock_server)
            .await;

        let coords = client_for(&mock_server).geocode("nowhere").await.unwrap();
        assert!(coords.is_none());
    }

    #[tokio::test]
    async fn test_geocode_null_body_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&mock_server)
            .await;

        let coords = client_for(&mock_server).geocode("nowhere").await.unwrap();
        assert!(coords.is_none());
    }

    #[tokio::test]
    async fn test_geocode_missing_location_is_malformed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{"geometry": {}}]
            })))
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server).geocode("somewhere").await;
        assert!(matches!(result, Err(WeatherError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_geocode_http_error_is_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server).geocode("somewhere").await;
        assert!(matches!(result, Err(WeatherError::Api { status: 403, .. })));
    }

    #[tokio::test]
    async fn test_geocode_blank_address_makes_no_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server).geocode("   ").await;
        assert!(matches!(result, Err(WeatherError::EmptyAddress)));
    }
}
