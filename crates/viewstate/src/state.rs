use foundation::geo::{LatLng, is_valid_lat, is_valid_lng};
use serde::{Deserialize, Serialize};

use crate::error::InvalidStateError;
use crate::provider::{LayerType, ProviderId};

pub const MIN_ZOOM: u8 = 0;
/// Highest zoom every provider serves tiles for.
pub const MAX_ZOOM: u8 = 18;

pub const DEFAULT_PROVIDER: ProviderId = ProviderId::Gmaps;
pub const DEFAULT_LAYER: LayerType = LayerType::Satellite;
pub const DEFAULT_LAT: f64 = 40.7128;
pub const DEFAULT_LNG: f64 = -74.0060;
pub const DEFAULT_ZOOM: u8 = 10;

/// What the map currently shows.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub provider: ProviderId,
    pub layer: LayerType,
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER,
            layer: DEFAULT_LAYER,
            lat: DEFAULT_LAT,
            lng: DEFAULT_LNG,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl ViewState {
    pub fn center(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    pub fn validate(&self) -> Result<(), InvalidStateError> {
        if !is_valid_lat(self.lat) {
            return Err(InvalidStateError::Latitude(self.lat));
        }
        if !is_valid_lng(self.lng) {
            return Err(InvalidStateError::Longitude(self.lng));
        }
        if self.zoom > MAX_ZOOM {
            return Err(InvalidStateError::Zoom {
                zoom: self.zoom,
                max: MAX_ZOOM,
            });
        }
        Ok(())
    }

    /// Merge: fields set in `update` replace ours, the rest are kept. Not validated.
    pub fn merged(&self, update: &ViewUpdate) -> ViewState {
        ViewState {
            provider: update.provider.unwrap_or(self.provider),
            layer: update.layer.unwrap_or(self.layer),
            lat: update.lat.unwrap_or(self.lat),
            lng: update.lng.unwrap_or(self.lng),
            zoom: update.zoom.unwrap_or(self.zoom),
        }
    }
}

/// Partial view state. Unset fields keep their current value.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct ViewUpdate {
    pub provider: Option<ProviderId>,
    pub layer: Option<LayerType>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub zoom: Option<u8>,
}

impl ViewUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, provider: ProviderId) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn layer(mut self, layer: LayerType) -> Self {
        self.layer = Some(layer);
        self
    }

    pub fn center(mut self, lat: f64, lng: f64) -> Self {
        self.lat = Some(lat);
        self.lng = Some(lng);
        self
    }

    pub fn zoom(mut self, zoom: u8) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<ViewState> for ViewUpdate {
    fn from(s: ViewState) -> Self {
        Self {
            provider: Some(s.provider),
            layer: Some(s.layer),
            lat: Some(s.lat),
            lng: Some(s.lng),
            zoom: Some(s.zoom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_ZOOM, ViewState, ViewUpdate};
    use crate::error::InvalidStateError;
    use crate::provider::{LayerType, ProviderId};
    use pretty_assertions::assert_eq;

    #[test]
    fn default_is_new_york_satellite() {
        let s = ViewState::default();
        assert_eq!(s.provider, ProviderId::Gmaps);
        assert_eq!(s.layer, LayerType::Satellite);
        assert_eq!((s.lat, s.lng, s.zoom), (40.7128, -74.0060, 10));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn merge_keeps_unspecified_fields() {
        let s = ViewState::default();
        let next = s.merged(&ViewUpdate::new().provider(ProviderId::Esri).zoom(3));
        assert_eq!(
            next,
            ViewState {
                provider: ProviderId::Esri,
                zoom: 3,
                ..s
            }
        );
    }

    #[test]
    fn validate_reports_offending_field() {
        let s = ViewState {
            lat: 91.0,
            ..ViewState::default()
        };
        assert_eq!(s.validate(), Err(InvalidStateError::Latitude(91.0)));

        let s = ViewState {
            lng: -180.5,
            ..ViewState::default()
        };
        assert_eq!(s.validate(), Err(InvalidStateError::Longitude(-180.5)));

        let s = ViewState {
            zoom: 19,
            ..ViewState::default()
        };
        assert_eq!(
            s.validate(),
            Err(InvalidStateError::Zoom {
                zoom: 19,
                max: MAX_ZOOM
            })
        );
    }

    #[test]
    fn nan_coordinates_are_invalid() {
        let s = ViewState {
            lat: f64::NAN,
            ..ViewState::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn full_update_from_state() {
        let target = ViewState {
            provider: ProviderId::Osm,
            layer: LayerType::Plain,
            lat: -33.8688,
            lng: 151.2093,
            zoom: 12,
        };
        assert_eq!(ViewState::default().merged(&target.into()), target);
        assert!(ViewUpdate::new().is_empty());
    }
}
