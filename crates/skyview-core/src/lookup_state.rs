//! Lookup cycle state machine (geocode → fetch → present).
//!
//! A user lookup walks every stage; a timer refresh skips geocoding.
//! Any stage may fail into `Error`, which settles back to `Idle`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupState {
    #[default]
    Idle,
    Geocoding,
    WeatherFetch,
    Presenting,
    Error,
}

impl LookupState {
    /// True while a request is in flight.
    pub fn is_busy(self) -> bool {
        matches!(self, LookupState::Geocoding | LookupState::WeatherFetch)
    }

    /// State after a user-triggered lookup is issued.
    ///
    /// A newer lookup supersedes whatever was in flight, so this is valid
    /// from every state.
    pub fn on_lookup_started(self) -> Self {
        LookupState::Geocoding
    }

    /// State after a timer refresh is issued.
    pub fn on_refresh_started(self) -> Self {
        LookupState::WeatherFetch
    }

    /// State after coordinates were resolved.
    pub fn on_geocoded(self) -> Self {
        match self {
            LookupState::Geocoding => LookupState::WeatherFetch,
            other => other,
        }
    }

    /// State after a forecast payload arrived.
    pub fn on_forecast(self) -> Self {
        match self {
            LookupState::Geocoding | LookupState::WeatherFetch => LookupState::Presenting,
            other => other,
        }
    }

    /// State after presentation finished.
    pub fn on_presented(self) -> Self {
        LookupState::Idle
    }

    /// State after any stage failed.
    pub fn on_failed(self) -> Self {
        LookupState::Error
    }

    /// State once the failure notice has been raised.
    pub fn on_error_reported(self) -> Self {
        match self {
            LookupState::Error => LookupState::Idle,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_every_stage() {
        let s = LookupState::Idle.on_lookup_started();
        assert_eq!(s, LookupState::Geocoding);
        assert!(s.is_busy());
        let s = s.on_geocoded();
        assert_eq!(s, LookupState::WeatherFetch);
        let s = s.on_forecast();
        assert_eq!(s, LookupState::Presenting);
        assert!(!s.is_busy());
        assert_eq!(s.on_presented(), LookupState::Idle);
    }

    #[test]
    fn refresh_skips_geocoding() {
        let s = LookupState::Idle.on_refresh_started();
        assert_eq!(s, LookupState::WeatherFetch);
        assert_eq!(s.on_geocoded(), LookupState::WeatherFetch);
    }

    #[test]
    fn failure_settles_to_idle() {
        let s = LookupState::Geocoding.on_failed();
        assert_eq!(s, LookupState::Error);
        assert_eq!(s.on_error_reported(), LookupState::Idle);
    }

    #[test]
    fn error_reported_is_noop_outside_error() {
        assert_eq!(
            LookupState::WeatherFetch.on_error_reported(),
            LookupState::WeatherFetch
        );
    }
}
