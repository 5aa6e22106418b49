//! Weather lookup for SkyView
//!
//! Geocodes addresses, fetches forecasts from weatherapi.com (via RapidAPI),
//! formats them for display and tracks per-session history and favorites.

mod http;

pub mod export;
pub mod geocode;
pub mod icon;
pub mod presenter;
pub mod provider;
pub mod session;
pub mod types;

pub use export::export_text;
pub use geocode::GeocodeClient;
pub use icon::{decode_icon, icon_url, IconFetcher};
pub use presenter::{favorite_query, present, Presentation};
pub use provider::WeatherProvider;
pub use session::{FavoriteError, SessionState};
pub use types::*;

pub use image::RgbaImage;
