use thiserror::Error;

/// A view state field is outside its valid range.
///
/// The store rejects such updates; callers clamp or reject upstream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidStateError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
    #[error("zoom {zoom} is outside [0, {max}]")]
    Zoom { zoom: u8, max: u8 },
}

/// A provider or layer code that is not in the enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown code {0:?}")]
pub struct UnknownCode(pub String);
