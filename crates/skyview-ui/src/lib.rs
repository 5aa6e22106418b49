//! SkyView front end: async weather service, view model and terminal shell.

pub mod error_mapping;
pub mod models;
pub mod services;
pub mod shell;

pub use models::{Notice, NoticeLevel, WeatherModel};
pub use services::{WeatherService, WeatherServiceMessage};
