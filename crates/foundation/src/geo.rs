use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Valid latitude range in decimal degrees.
pub const LAT_RANGE: RangeInclusive<f64> = -90.0..=90.0;
/// Valid longitude range in decimal degrees.
pub const LNG_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// Two points closer than this on both axes are the same place (~100 m at the equator).
///
/// Shared by favorite de-duplication and history supersession.
pub const PROXIMITY_THRESHOLD_DEG: f64 = 0.001;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both components are finite and inside their ranges.
    pub fn is_valid(&self) -> bool {
        is_valid_lat(self.lat) && is_valid_lng(self.lng)
    }

    /// Proximity rule: `|Δlat| < threshold ∧ |Δlng| < threshold`.
    pub fn is_same_place(&self, other: &LatLng) -> bool {
        (self.lat - other.lat).abs() < PROXIMITY_THRESHOLD_DEG
            && (self.lng - other.lng).abs() < PROXIMITY_THRESHOLD_DEG
    }
}

pub fn is_valid_lat(lat: f64) -> bool {
    LAT_RANGE.contains(&lat)
}

pub fn is_valid_lng(lng: f64) -> bool {
    LNG_RANGE.contains(&lng)
}

/// Wraps a longitude into [-180, 180]. Values already in range are returned unchanged.
///
/// Map surfaces report longitudes past the antimeridian after a user pans across it.
pub fn wrap_lng(lng: f64) -> f64 {
    if is_valid_lng(lng) || !lng.is_finite() {
        return lng;
    }
    let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid maps +180 to -180; keep the sign of the input at the seam.
    if wrapped == -180.0 && lng > 0.0 {
        180.0
    } else {
        wrapped
    }
}

pub fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(*LAT_RANGE.start(), *LAT_RANGE.end())
}

#[cfg(test)]
mod tests {
    use super::{LatLng, clamp_lat, is_valid_lng, wrap_lng};
    use proptest::prelude::*;

    #[test]
    fn same_place_within_threshold() {
        let a = LatLng::new(40.7128, -74.0060);
        let b = LatLng::new(40.71285, -74.00605);
        assert!(a.is_same_place(&b));
        assert!(b.is_same_place(&a));
    }

    #[test]
    fn one_axis_outside_threshold_is_a_different_place() {
        let a = LatLng::new(40.7128, -74.0060);
        assert!(!a.is_same_place(&LatLng::new(40.7148, -74.0060)));
        assert!(!a.is_same_place(&LatLng::new(40.7128, -74.0040)));
    }

    #[test]
    fn validity_rejects_nan_and_out_of_range() {
        assert!(LatLng::new(90.0, -180.0).is_valid());
        assert!(!LatLng::new(90.5, 0.0).is_valid());
        assert!(!LatLng::new(0.0, 180.01).is_valid());
        assert!(!LatLng::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn wrap_lng_examples() {
        assert_eq!(wrap_lng(-74.006), -74.006);
        assert_eq!(wrap_lng(180.0), 180.0);
        assert_eq!(wrap_lng(190.0), -170.0);
        assert_eq!(wrap_lng(-190.0), 170.0);
        assert_eq!(wrap_lng(540.0), 180.0);
    }

    #[test]
    fn clamp_lat_limits() {
        assert_eq!(clamp_lat(91.0), 90.0);
        assert_eq!(clamp_lat(-120.0), -90.0);
        assert_eq!(clamp_lat(12.5), 12.5);
    }

    proptest! {
        #[test]
        fn wrapped_longitude_is_always_valid(lng in -10_000.0f64..10_000.0) {
            prop_assert!(is_valid_lng(wrap_lng(lng)));
        }
    }
}
