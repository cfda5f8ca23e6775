use thiserror::Error;

/// History and notice label for a geolocation fix.
pub const CURRENT_LOCATION_NAME: &str = "Current location";

/// Why a geolocation request produced no fix.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    Unavailable,
    #[error("location request timed out")]
    Timeout,
    #[error("geolocation is not supported")]
    Unsupported,
}

impl LocateError {
    /// Maps a `GeolocationPositionError.code`.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => LocateError::PermissionDenied,
            3 => LocateError::Timeout,
            _ => LocateError::Unavailable,
        }
    }
}
