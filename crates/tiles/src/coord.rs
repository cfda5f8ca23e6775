use serde::{Deserialize, Serialize};
use viewstate::MAX_ZOOM;

/// Tile coordinate in the ZXY (slippy map) scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Tiles per axis at zoom `z`. Zooms past [`MAX_ZOOM`] count as `MAX_ZOOM`.
    pub fn tiles_per_axis(z: u8) -> u32 {
        1u32 << z.min(MAX_ZOOM)
    }

    /// The Web Mercator tile containing `(lat, lng)` at zoom `z`.
    ///
    /// Latitudes beyond the Mercator limit (~±85.0511°) land in the edge row.
    /// `z` is capped at [`MAX_ZOOM`].
    pub fn containing(lat: f64, lng: f64, z: u8) -> Self {
        let z = z.min(MAX_ZOOM);
        let n = Self::tiles_per_axis(z) as f64;
        let max_index = n - 1.0;

        let x = ((lng + 180.0) / 360.0 * n).floor().clamp(0.0, max_index);

        let lat_rad = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT).to_radians();
        let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0
            * n)
            .floor()
            .clamp(0.0, max_index);

        Self::new(z, x as u32, y as u32)
    }
}

/// Latitude where Web Mercator is cut off to make the world square.
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

#[cfg(test)]
mod tests {
    use super::TileCoord;

    #[test]
    fn zoom_zero_is_single_tile() {
        assert_eq!(TileCoord::containing(40.7, -74.0, 0), TileCoord::new(0, 0, 0));
        assert_eq!(TileCoord::containing(90.0, 180.0, 0), TileCoord::new(0, 0, 0));
    }

    #[test]
    fn new_york_at_zoom_ten() {
        // Matches the tile any XYZ map shows for lower Manhattan.
        assert_eq!(
            TileCoord::containing(40.7128, -74.0060, 10),
            TileCoord::new(10, 301, 385)
        );
    }

    #[test]
    fn deeper_tile_halves_its_parent() {
        let (lat, lng) = (-33.8688, 151.2093);
        for z in 0..18 {
            let parent = TileCoord::containing(lat, lng, z);
            let child = TileCoord::containing(lat, lng, z + 1);
            assert_eq!((child.x >> 1, child.y >> 1), (parent.x, parent.y), "z={z}");
        }
    }

    #[test]
    fn zoom_past_the_limit_is_capped() {
        assert_eq!(TileCoord::tiles_per_axis(40), 1u32 << 18);
        let t = TileCoord::containing(0.0, 0.0, 40);
        assert_eq!(t.z, 18);
        assert_eq!((t.x, t.y), (1u32 << 17, 1u32 << 17));
        assert_eq!(TileCoord::containing(0.0, 0.0, u8::MAX).z, 18);
    }

    #[test]
    fn edges_clamp_into_grid() {
        let t = TileCoord::containing(-90.0, 180.0, 3);
        assert_eq!(t, TileCoord::new(3, 7, 7));
    }
}
