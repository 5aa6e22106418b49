pub mod weather_model;

pub use weather_model::{Notice, NoticeLevel, WeatherModel};
