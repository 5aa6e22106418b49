//! Maps UI service errors to skyview_core::AppError for consistent user-facing messages.

mod weather;

pub(crate) use weather::{client_error, favorite_error};
