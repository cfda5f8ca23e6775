//! Tile source per `(provider, layer)`.
//!
//! [`resolve`] is an exhaustive `match` over all ten pairs, so a missing
//! combination is a compile error rather than a runtime fallback. Providers
//! disagree on path order: Esri (and the Esri imagery used for OSM
//! satellite) serves `{z}/{y}/{x}`, everyone else `{z}/{x}/{y}`.

use serde::{Deserialize, Serialize};
use viewstate::{LayerType, MAX_ZOOM, ProviderId};

use crate::coord::TileCoord;

/// Tile URL template plus the attribution that must be displayed with it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSource {
    pub url_template: &'static str,
    pub attribution: &'static str,
    pub max_zoom: u8,
    /// Values for `{s}`; empty when the template has none.
    pub subdomains: &'static [&'static str],
}

/// Credentials substituted into templates that need them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileKeys {
    pub mapbox_access_token: String,
    pub here_api_key: String,
}

impl Default for TileKeys {
    fn default() -> Self {
        Self {
            mapbox_access_token: String::new(),
            here_api_key: "demo".to_string(),
        }
    }
}

const GOOGLE: &str = "© Google";
const MAPBOX: &str = "© Mapbox © OpenStreetMap";
const ESRI: &str = "© Esri";
const HERE: &str = "© HERE";
const OSM: &str = "© OpenStreetMap contributors";

const NO_SUBDOMAINS: &[&str] = &[];
const OSM_SUBDOMAINS: &[&str] = &["a", "b", "c"];

const fn source(url_template: &'static str, attribution: &'static str) -> TileSource {
    TileSource {
        url_template,
        attribution,
        max_zoom: MAX_ZOOM,
        subdomains: NO_SUBDOMAINS,
    }
}

pub fn resolve(provider: ProviderId, layer: LayerType) -> TileSource {
    use LayerType::{Plain, Satellite};
    use ProviderId::{Esri, Gmaps, Here, Mapbox, Osm};

    match (provider, layer) {
        (Gmaps, Satellite) => source("https://mt1.google.com/vt/lyrs=s&x={x}&y={y}&z={z}", GOOGLE),
        (Gmaps, Plain) => source("https://mt1.google.com/vt/lyrs=m&x={x}&y={y}&z={z}", GOOGLE),
        (Mapbox, Satellite) => source(
            "https://api.mapbox.com/styles/v1/mapbox/satellite-v9/tiles/{z}/{x}/{y}?access_token={accessToken}",
            MAPBOX,
        ),
        (Mapbox, Plain) => source(
            "https://api.mapbox.com/styles/v1/mapbox/streets-v11/tiles/{z}/{x}/{y}?access_token={accessToken}",
            MAPBOX,
        ),
        (Esri, Satellite) => source(
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
            ESRI,
        ),
        (Esri, Plain) => source(
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Street_Map/MapServer/tile/{z}/{y}/{x}",
            ESRI,
        ),
        (Here, Satellite) => source(
            "https://2.aerial.maps.ls.hereapi.com/maptile/2.1/maptile/newest/satellite.day/{z}/{x}/{y}/512/png8?apiKey={apiKey}",
            HERE,
        ),
        (Here, Plain) => source(
            "https://2.base.maps.ls.hereapi.com/maptile/2.1/maptile/newest/normal.day/{z}/{x}/{y}/512/png8?apiKey={apiKey}",
            HERE,
        ),
        // OSM has no imagery of its own; satellite falls through to Esri's.
        (Osm, Satellite) => source(
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
            ESRI,
        ),
        (Osm, Plain) => TileSource {
            subdomains: OSM_SUBDOMAINS,
            ..source("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", OSM)
        },
    }
}

impl TileSource {
    /// Template with credentials filled in, for renderers that expand
    /// `{z}/{x}/{y}/{s}` themselves.
    pub fn keyed_template(&self, keys: &TileKeys) -> String {
        self.url_template
            .replace("{accessToken}", &keys.mapbox_access_token)
            .replace("{apiKey}", &keys.here_api_key)
    }

    /// Concrete URL for one tile.
    pub fn tile_url(&self, coord: TileCoord, keys: &TileKeys) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let i = (coord.x as usize + coord.y as usize) % self.subdomains.len();
            self.subdomains[i]
        };

        self.keyed_template(keys)
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
            .replace("{s}", subdomain)
    }
}

#[cfg(test)]
mod tests {
    use super::{TileKeys, resolve};
    use crate::coord::TileCoord;
    use pretty_assertions::assert_eq;
    use viewstate::{LayerType, MAX_ZOOM, ProviderId};

    #[test]
    fn every_pair_resolves() {
        let mut seen = 0;
        for provider in ProviderId::ALL {
            for layer in LayerType::ALL {
                let src = resolve(provider, layer);
                assert!(!src.url_template.is_empty(), "{provider}/{layer}");
                assert!(!src.attribution.is_empty(), "{provider}/{layer}");
                assert_eq!(src.max_zoom, MAX_ZOOM);
                for placeholder in ["{z}", "{x}", "{y}"] {
                    assert!(src.url_template.contains(placeholder));
                }
                seen += 1;
            }
        }
        assert_eq!(seen, 10);
    }

    #[test]
    fn layers_differ_per_provider_except_shared_imagery() {
        for provider in ProviderId::ALL {
            let s = resolve(provider, LayerType::Satellite);
            let p = resolve(provider, LayerType::Plain);
            assert_ne!(s.url_template, p.url_template, "{provider}");
        }
        assert_eq!(
            resolve(ProviderId::Osm, LayerType::Satellite).url_template,
            resolve(ProviderId::Esri, LayerType::Satellite).url_template
        );
    }

    #[test]
    fn esri_orders_row_before_column() {
        let coord = TileCoord::new(5, 9, 12);
        let url = resolve(ProviderId::Esri, LayerType::Satellite).tile_url(coord, &TileKeys::default());
        assert!(url.ends_with("/tile/5/12/9"), "{url}");

        let url = resolve(ProviderId::Mapbox, LayerType::Plain).tile_url(
            coord,
            &TileKeys {
                mapbox_access_token: "pk.test".to_string(),
                ..TileKeys::default()
            },
        );
        assert!(url.contains("/tiles/5/9/12?access_token=pk.test"), "{url}");
    }

    #[test]
    fn google_uses_query_parameters() {
        let url = resolve(ProviderId::Gmaps, LayerType::Plain)
            .tile_url(TileCoord::new(3, 1, 2), &TileKeys::default());
        assert_eq!(url, "https://mt1.google.com/vt/lyrs=m&x=1&y=2&z=3");
    }

    #[test]
    fn osm_rotates_subdomains() {
        let src = resolve(ProviderId::Osm, LayerType::Plain);
        let keys = TileKeys::default();
        assert_eq!(
            src.tile_url(TileCoord::new(2, 0, 0), &keys),
            "https://a.tile.openstreetmap.org/2/0/0.png"
        );
        assert_eq!(
            src.tile_url(TileCoord::new(2, 1, 1), &keys),
            "https://c.tile.openstreetmap.org/2/1/1.png"
        );
    }

    #[test]
    fn here_gets_api_key() {
        let url = resolve(ProviderId::Here, LayerType::Satellite)
            .tile_url(TileCoord::new(1, 0, 1), &TileKeys::default());
        assert!(url.ends_with("/1/0/1/512/png8?apiKey=demo"), "{url}");
    }

    #[test]
    fn keyed_template_keeps_tile_placeholders() {
        let keys = TileKeys {
            mapbox_access_token: "pk.abc".to_string(),
            ..TileKeys::default()
        };
        let t = resolve(ProviderId::Mapbox, LayerType::Satellite).keyed_template(&keys);
        assert!(t.contains("access_token=pk.abc"), "{t}");
        assert!(t.contains("{z}/{x}/{y}"), "{t}");
    }
}
