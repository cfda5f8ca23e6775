use thiserror::Error;

/// Geocoding request failed. Callers show zero results; it is never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(String),
    #[error("geocoder answered with status {0}")]
    Status(u16),
    #[error("unreadable geocoder response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else {
            TransportError::Http(e.to_string())
        }
    }
}
