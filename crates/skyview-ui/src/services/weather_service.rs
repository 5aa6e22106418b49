//! Weather backend: async geocode/forecast/icon fetching.
//! All network work runs off the shell loop; results sent via mpsc.
//!
//! Every lookup or refresh bumps a generation counter and cancels the request
//! it supersedes, so the newest request always wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use skyview_core::{Config, NetworkError, ReqwestErrorExt};
use skyview_weather::{
    Coordinates, ForecastPayload, GeocodeClient, IconFetcher, RgbaImage, TemperatureUnit,
    WeatherError as ClientError, WeatherProvider,
};

/// Why a geocode or forecast request failed.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureCause {
    /// Transport failure, by kind (timeout, refused connection, ...)
    Network(NetworkError),
    /// The service answered with nothing usable
    Service(String),
}

impl std::fmt::Display for FailureCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureCause::Network(e) => write!(f, "{}", e),
            FailureCause::Service(s) => write!(f, "{}", s),
        }
    }
}

/// Error type for weather operations
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherError {
    /// Geocoding failed or returned no match
    Geocode(FailureCause),
    /// Forecast fetch failed
    Fetch(FailureCause),
    /// Icon download or decode failed
    Icon(String),
    /// No API key configured
    MissingApiKey,
}

impl std::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherError::Geocode(c) => write!(f, "Geocoding error: {}", c),
            WeatherError::Fetch(c) => write!(f, "Weather error: {}", c),
            WeatherError::Icon(s) => write!(f, "Icon error: {}", s),
            WeatherError::MissingApiKey => write!(f, "Weather API key not configured"),
        }
    }
}

impl std::error::Error for WeatherError {}

fn classify(err: ClientError, wrap: fn(FailureCause) -> WeatherError) -> WeatherError {
    match err {
        ClientError::MissingApiKey => WeatherError::MissingApiKey,
        ClientError::Network(e) => wrap(FailureCause::Network(e.into_network_error())),
        other => wrap(FailureCause::Service(other.to_string())),
    }
}

/// Messages sent from async operations back to the shell loop
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Address resolved; the forecast fetch is under way
    Geocoded {
        generation: u64,
        coordinates: Coordinates,
    },
    /// Result of a lookup or refresh, tagged with the unit it was requested in
    FetchDone {
        generation: u64,
        unit: TemperatureUnit,
        result: Result<ForecastPayload, WeatherError>,
    },
    /// Decoded condition icon for the given generation
    IconDone {
        generation: u64,
        result: Result<RgbaImage, WeatherError>,
    },
}

impl WeatherServiceMessage {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Geocoded { generation, .. }
            | Self::FetchDone { generation, .. }
            | Self::IconDone { generation, .. } => *generation,
        }
    }
}

pub struct WeatherService {
    runtime: tokio::runtime::Handle,
    geocoder: Arc<GeocodeClient>,
    provider: Arc<WeatherProvider>,
    icons: Arc<IconFetcher>,
    tx: mpsc::UnboundedSender<WeatherServiceMessage>,
    generation: AtomicU64,
    cancel_token: Mutex<Option<CancellationToken>>,
}

impl WeatherService {
    /// Build the clients from config. The receiver yields every result message.
    pub fn new(
        config: &Config,
        runtime: tokio::runtime::Handle,
    ) -> Result<(Self, mpsc::UnboundedReceiver<WeatherServiceMessage>), ClientError> {
        let timeout = Duration::from_secs(config.weather.request_timeout_secs);
        let geocoder = GeocodeClient::new(&config.api, timeout)?;
        let provider = WeatherProvider::new(&config.api, timeout)?;
        let icons = IconFetcher::new(timeout)?;
        let (tx, rx) = mpsc::unbounded_channel();

        Ok((
            Self {
                runtime,
                geocoder: Arc::new(geocoder),
                provider: Arc::new(provider),
                icons: Arc::new(icons),
                tx,
                generation: AtomicU64::new(0),
                cancel_token: Mutex::new(None),
            },
            rx,
        ))
    }

    /// Generation of the most recently issued request.
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Start a new request, cancelling the one it supersedes.
    fn begin_request(&self) -> (u64, CancellationToken) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        if let Some(previous) = self.cancel_token.lock().replace(token.clone()) {
            previous.cancel();
        }
        (generation, token)
    }

    /// Cancel whatever is in flight.
    pub fn cancel(&self) {
        if let Some(token) = self.cancel_token.lock().take() {
            token.cancel();
            tracing::info!("Weather request cancelled");
        }
    }

    /// Geocode `address` then fetch its forecast.
    /// Sends `Geocoded` (on success) followed by `FetchDone`.
    pub fn request_lookup(&self, address: String, unit: TemperatureUnit) -> u64 {
        let (generation, token) = self.begin_request();
        let tx = self.tx.clone();
        let geocoder = self.geocoder.clone();
        let provider = self.provider.clone();

        self.runtime.spawn(async move {
            let work = async {
                let coordinates = match geocoder.geocode(&address).await {
                    Ok(Some(c)) => c,
                    Ok(None) => {
                        return Err(WeatherError::Geocode(FailureCause::Service(format!(
                            "no match for '{}'",
                            address
                        ))))
                    }
                    Err(e) => return Err(classify(e, WeatherError::Geocode)),
                };
                let _ = tx.send(WeatherServiceMessage::Geocoded {
                    generation,
                    coordinates,
                });

                provider
                    .fetch_forecast(coordinates)
                    .await
                    .map_err(|e| classify(e, WeatherError::Fetch))
            };

            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("Lookup {} cancelled", generation);
                }
                result = work => {
                    let _ = tx.send(WeatherServiceMessage::FetchDone { generation, unit, result });
                }
            }
        });

        generation
    }

    /// Re-fetch the forecast for known coordinates, skipping the geocoder.
    pub fn request_refresh(&self, coordinates: Coordinates, unit: TemperatureUnit) -> u64 {
        let (generation, token) = self.begin_request();
        let tx = self.tx.clone();
        let provider = self.provider.clone();

        self.runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("Refresh {} cancelled", generation);
                }
                result = provider.fetch_forecast(coordinates) => {
                    let result = result.map_err(|e| classify(e, WeatherError::Fetch));
                    let _ = tx.send(WeatherServiceMessage::FetchDone { generation, unit, result });
                }
            }
        });

        generation
    }

    /// Download the condition icon for an already-issued request.
    ///
    /// Shares that request's cancellation, so a newer lookup drops it too.
    pub fn request_icon(&self, generation: u64, url: String) {
        let tx = self.tx.clone();
        let icons = self.icons.clone();
        let current = self.cancel_token.lock().clone();
        let token = match current {
            Some(t) if generation == self.current_generation() => t,
            _ => {
                tracing::debug!("Skipping icon for stale request {}", generation);
                return;
            }
        };

        self.runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                result = icons.fetch(&url) => {
                    let result = result.map_err(|e| WeatherError::Icon(e.to_string()));
                    let _ = tx.send(WeatherServiceMessage::IconDone { generation, result });
                }
            }
        });
    }
}
