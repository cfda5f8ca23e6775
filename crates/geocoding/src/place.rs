use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// A candidate location returned by a geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Full label, e.g. "Paris, Île-de-France, France".
    pub display_label: String,
    /// Kind of place as reported by the geocoder (city, road, ...).
    pub kind: String,
}

/// Turns free text into an ordered list of candidate places.
pub trait Geocoder {
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Place>, TransportError>>;
}

