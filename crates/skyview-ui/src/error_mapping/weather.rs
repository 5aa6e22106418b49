use crate::services::weather_service::WeatherError as UiWeatherError;
use skyview_core::{AppError, WeatherError};
use skyview_weather::{FavoriteError, WeatherError as ClientError};

impl From<UiWeatherError> for AppError {
    fn from(e: UiWeatherError) -> Self {
        match e {
            UiWeatherError::Geocode(cause) => {
                AppError::Weather(WeatherError::GeocodeFailed(cause.to_string()))
            }
            UiWeatherError::Fetch(cause) => {
                AppError::Weather(WeatherError::FetchFailed(cause.to_string()))
            }
            UiWeatherError::Icon(s) => AppError::Service(s),
            UiWeatherError::MissingApiKey => AppError::Weather(WeatherError::InvalidApiKey),
        }
    }
}

pub(crate) fn favorite_error(e: FavoriteError) -> AppError {
    AppError::Weather(WeatherError::FavoriteRejected(e.to_string()))
}

/// Only export failures reach the user directly from the client crate.
pub(crate) fn client_error(e: ClientError) -> AppError {
    match e {
        ClientError::EmptyAddress => AppError::Weather(WeatherError::EmptyAddress),
        ClientError::Export { source, .. } => {
            AppError::Weather(WeatherError::ExportFailed(source.to_string()))
        }
        other => AppError::Service(other.to_string()),
    }
}
