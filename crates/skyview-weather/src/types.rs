use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use skyview_core::TemperatureUnit;

/// Geographic coordinates resolved from an address.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `lat,lng` form used by the weather service's `q` parameter.
    pub fn to_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Forecast response from the weather service.
///
/// Only the fields the presenter reads are modelled; unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPayload {
    pub location: PlaceInfo,
    pub current: CurrentConditions,
    pub forecast: Forecast,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceInfo {
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Current conditions; temperature and wind come in both unit systems.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: Condition,
    pub humidity: f64,
    pub wind_kph: f64,
    pub wind_mph: f64,
}

impl CurrentConditions {
    pub fn temperature(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::Celsius => self.temp_c,
            TemperatureUnit::Fahrenheit => self.temp_f,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub day: DaySummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummary {
    pub condition: Condition,
    pub maxtemp_c: f64,
    pub maxtemp_f: f64,
    pub mintemp_c: f64,
    pub mintemp_f: f64,
}

impl DaySummary {
    pub fn max_temp(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::Celsius => self.maxtemp_c,
            TemperatureUnit::Fahrenheit => self.maxtemp_f,
        }
    }

    pub fn min_temp(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::Celsius => self.mintemp_c,
            TemperatureUnit::Fahrenheit => self.mintemp_f,
        }
    }
}

/// Weather crate errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Address is empty")]
    EmptyAddress,
    #[error("API key is not configured")]
    MissingApiKey,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Response body was empty")]
    EmptyResponse,
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Icon decode error: {0}")]
    Image(String),
    #[error("Failed to write {}: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
