//! Per-session lookup state: last coordinates, history, favorites.
//! Lives only in memory; nothing is persisted across runs.

use crate::types::Coordinates;

/// Why a favorite could not be added.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FavoriteError {
    #[error("no location is currently displayed")]
    NothingDisplayed,
    #[error("'{0}' is already in favorites")]
    Duplicate(String),
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    last_coordinates: Option<Coordinates>,
    history: Vec<String>,
    favorites: Vec<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coordinates used by the auto-refresh; set only after a successful geocode.
    pub fn last_coordinates(&self) -> Option<Coordinates> {
        self.last_coordinates
    }

    pub fn set_last_coordinates(&mut self, coords: Coordinates) {
        self.last_coordinates = Some(coords);
    }

    /// Append-only; duplicates are kept.
    pub fn push_history(&mut self, entry: impl Into<String>) {
        self.history.push(entry.into());
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Append a favorite unless it is empty or already present (exact match).
    pub fn add_favorite(&mut self, label: &str) -> Result<(), FavoriteError> {
        if label.trim().is_empty() {
            return Err(FavoriteError::NothingDisplayed);
        }
        if self.favorites.iter().any(|f| f == label) {
            return Err(FavoriteError::Duplicate(label.to_string()));
        }
        self.favorites.push(label.to_string());
        Ok(())
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn favorite(&self, index: usize) -> Option<&str> {
        self.favorites.get(index).map(String::as_str)
    }
}
