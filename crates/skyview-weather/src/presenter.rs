//! Formatting of a forecast payload into display text.

use std::fmt::Write as _;

use crate::icon::icon_url;
use crate::types::{ForecastPayload, TemperatureUnit};

/// Text shown before the first lookup.
pub const SUMMARY_PLACEHOLDER: &str = "Weather information will be displayed here.";
/// Heading of the forecast block; also its placeholder.
pub const FORECAST_HEADER: &str = "7-Day Forecast:";

/// Separator between a favorite's place name and its temperature tag.
const LABEL_SEPARATOR: &str = " - ";

/// Everything the UI needs to show one fetched payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub summary: String,
    pub forecast: String,
    pub history_entry: String,
    pub icon_url: Option<String>,
}

/// Render `payload` using the unit the request was issued under.
pub fn present(payload: &ForecastPayload, unit: TemperatureUnit) -> Presentation {
    let place = format!("{}, {}", payload.location.name, payload.location.country);
    let current = &payload.current;
    let temp = current.temperature(unit);
    let suffix = unit.suffix();

    let summary = format!(
        "Weather in {place}:\n\n\
         Temperature: {temp}°{suffix}\n\
         Condition: {}\n\
         Humidity: {}%\n\
         Wind Speed: {} kph ({} mph)",
        current.condition.text, current.humidity, current.wind_kph, current.wind_mph,
    );

    // Provider order is kept as-is
    let mut forecast = format!("{}\n", FORECAST_HEADER);
    for day in &payload.forecast.forecastday {
        let _ = writeln!(
            forecast,
            "{}: {}, Max: {}°, Min: {}°",
            day.date.format("%Y-%m-%d"),
            day.day.condition.text,
            day.day.max_temp(unit),
            day.day.min_temp(unit),
        );
    }

    Presentation {
        summary,
        forecast,
        history_entry: format!("{place}{LABEL_SEPARATOR}{temp}°{suffix}"),
        icon_url: current
            .condition
            .icon
            .as_deref()
            .filter(|i| !i.trim().is_empty())
            .map(icon_url),
    }
}

/// Place name to geocode when a favorite label is opened.
///
/// `"Paris, France - 20°C"` → `"Paris, France"`.
pub fn favorite_query(label: &str) -> &str {
    label
        .split(LABEL_SEPARATOR)
        .next()
        .unwrap_or(label)
        .trim()
}
