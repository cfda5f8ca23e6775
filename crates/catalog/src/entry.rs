use foundation::geo::LatLng;
use serde::{Deserialize, Serialize};
use viewstate::{LayerType, ProviderId, ViewState};

/// A place the user saved on purpose. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
    pub provider: ProviderId,
    #[serde(rename = "type")]
    pub layer: LayerType,
    #[serde(rename = "createdAt", alias = "createdAtMs", with = "crate::timestamp")]
    pub created_at_ms: u64,
}

/// A place the user navigated to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
    pub provider: ProviderId,
    #[serde(rename = "type")]
    pub layer: LayerType,
    #[serde(rename = "visitedAt", alias = "visitedAtMs", with = "crate::timestamp")]
    pub visited_at_ms: u64,
}

/// Anything with a position that takes part in proximity de-duplication.
pub trait Located {
    fn position(&self) -> LatLng;

    fn is_near(&self, point: LatLng) -> bool {
        self.position().is_same_place(&point)
    }
}

impl Located for FavoriteEntry {
    fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

impl Located for HistoryEntry {
    fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

impl FavoriteEntry {
    pub fn from_view(id: String, name: String, view: &ViewState, created_at_ms: u64) -> Self {
        Self {
            id,
            name,
            lat: view.lat,
            lng: view.lng,
            zoom: view.zoom,
            provider: view.provider,
            layer: view.layer,
            created_at_ms,
        }
    }
}

impl HistoryEntry {
    pub fn from_view(id: String, name: String, view: &ViewState, visited_at_ms: u64) -> Self {
        Self {
            id,
            name,
            lat: view.lat,
            lng: view.lng,
            zoom: view.zoom,
            provider: view.provider,
            layer: view.layer,
            visited_at_ms,
        }
    }
}
