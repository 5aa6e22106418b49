use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use skyview_core::{AppError, LookupState, WeatherError};
use skyview_weather::presenter::{FORECAST_HEADER, SUMMARY_PLACEHOLDER};
use skyview_weather::{
    export_text, favorite_query, present, ForecastPayload, RgbaImage, SessionState,
    TemperatureUnit,
};

use crate::error_mapping;
use crate::services::{WeatherService, WeatherServiceMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A blocking message the shell shows to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            message: message.into(),
        }
    }
}

impl From<&AppError> for Notice {
    fn from(e: &AppError) -> Self {
        Notice::warning(e.title(), e.user_message())
    }
}

/// View state for the weather window: displayed text, icon, unit selector,
/// session lists and pending notices.
pub struct WeatherModel {
    service: Arc<WeatherService>,
    session: SessionState,
    unit: TemperatureUnit,
    state: LookupState,
    /// Generation whose results may still update the display
    pending: Option<u64>,
    summary: String,
    forecast: String,
    icon: Option<RgbaImage>,
    /// History-entry text of the result currently on screen
    displayed_label: Option<String>,
    notices: VecDeque<Notice>,
    changed: bool,
}

impl WeatherModel {
    pub fn new(service: Arc<WeatherService>, unit: TemperatureUnit) -> Self {
        Self {
            service,
            session: SessionState::new(),
            unit,
            state: LookupState::Idle,
            pending: None,
            summary: SUMMARY_PLACEHOLDER.to_string(),
            forecast: FORECAST_HEADER.to_string(),
            icon: None,
            displayed_label: None,
            notices: VecDeque::new(),
            changed: false,
        }
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn forecast(&self) -> &str {
        &self.forecast
    }

    pub fn icon(&self) -> Option<&RgbaImage> {
        self.icon.as_ref()
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn state(&self) -> LookupState {
        self.state
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Takes effect on the next request; the display is not re-rendered.
    pub fn set_unit(&mut self, unit: TemperatureUnit) {
        self.unit = unit;
    }

    /// True once after the displayed text or icon changed.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn notify_error(&mut self, error: AppError) {
        tracing::warn!("{}", error);
        self.notices.push_back(Notice::from(&error));
    }

    /// Look up the weather for a user-entered address.
    ///
    /// Returns false (and queues an input notice) when the address is blank;
    /// no request is made in that case.
    pub fn submit_address(&mut self, address: &str) -> bool {
        let address = address.trim();
        if address.is_empty() {
            self.notify_error(AppError::Weather(WeatherError::EmptyAddress));
            return false;
        }

        let generation = self.service.request_lookup(address.to_string(), self.unit);
        tracing::info!("Lookup {} started for '{}'", generation, address);
        self.pending = Some(generation);
        self.state = self.state.on_lookup_started();
        true
    }

    /// Timer tick: re-fetch the last location without geocoding.
    ///
    /// Does nothing before the first successful geocode or while a request is
    /// in flight.
    pub fn refresh(&mut self) -> bool {
        let Some(coordinates) = self.session.last_coordinates() else {
            tracing::debug!("Refresh skipped: no location yet");
            return false;
        };
        if self.state.is_busy() {
            tracing::debug!("Refresh skipped: request in flight");
            return false;
        }

        let generation = self.service.request_refresh(coordinates, self.unit);
        tracing::info!("Refresh {} started", generation);
        self.pending = Some(generation);
        self.state = self.state.on_refresh_started();
        true
    }

    pub fn add_to_favorites(&mut self) {
        let label = self.displayed_label.clone().unwrap_or_default();
        match self.session.add_favorite(&label) {
            Ok(()) => {
                tracing::info!("Added favorite '{}'", label);
                self.changed = true;
            }
            Err(e) => self.notify_error(error_mapping::favorite_error(e)),
        }
    }

    /// Re-run a full lookup for the favorite at `index`.
    pub fn open_favorite(&mut self, index: usize) -> bool {
        let Some(label) = self.session.favorite(index) else {
            self.notices
                .push_back(Notice::warning("Error", format!("No favorite #{}.", index + 1)));
            return false;
        };
        let query = favorite_query(label).to_string();
        self.submit_address(&query)
    }

    /// Export the displayed summary and forecast.
    pub fn save(&mut self, path: &Path) -> bool {
        match export_text(path, &self.summary, &self.forecast) {
            Ok(()) => {
                self.notices.push_back(Notice::info(
                    "Success",
                    format!("Weather information saved to {}", path.display()),
                ));
                true
            }
            Err(e) => {
                self.notify_error(error_mapping::client_error(e));
                false
            }
        }
    }

    /// Apply a service result. Results from superseded requests are dropped.
    pub fn apply(&mut self, msg: WeatherServiceMessage) {
        if self.pending != Some(msg.generation()) {
            tracing::debug!("Discarding stale result for request {}", msg.generation());
            return;
        }

        match msg {
            WeatherServiceMessage::Geocoded { coordinates, .. } => {
                self.session.set_last_coordinates(coordinates);
                self.state = self.state.on_geocoded();
            }
            WeatherServiceMessage::FetchDone {
                generation,
                unit,
                result,
            } => match result {
                Ok(payload) => self.show(generation, &payload, unit),
                Err(e) => {
                    self.state = self.state.on_failed();
                    self.notify_error(AppError::from(e));
                    self.state = self.state.on_error_reported();
                }
            },
            WeatherServiceMessage::IconDone { result, .. } => match result {
                Ok(img) => {
                    self.icon = Some(img);
                    self.changed = true;
                }
                Err(e) => tracing::warn!("Icon unavailable: {}", e),
            },
        }
    }

    fn show(&mut self, generation: u64, payload: &ForecastPayload, unit: TemperatureUnit) {
        self.state = self.state.on_forecast();

        let presentation = present(payload, unit);
        self.summary = presentation.summary;
        self.forecast = presentation.forecast;
        self.icon = None;
        self.session.push_history(presentation.history_entry.clone());
        self.displayed_label = Some(presentation.history_entry);
        self.changed = true;

        if let Some(url) = presentation.icon_url {
            self.service.request_icon(generation, url);
        }

        self.state = self.state.on_presented();
    }
}
