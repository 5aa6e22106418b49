pub mod weather_service;

pub use weather_service::{FailureCause, WeatherError, WeatherService, WeatherServiceMessage};
