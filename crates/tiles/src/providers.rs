use serde::Serialize;
use viewstate::ProviderId;

/// Human-facing description of a provider for the provider-info dialog.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub id: ProviderId,
    pub name: &'static str,
    pub description: &'static str,
    pub features: [&'static str; 3],
    /// Digit key that selects this provider.
    pub shortcut: char,
}

pub fn provider_info(id: ProviderId) -> ProviderInfo {
    let (name, description, features) = match id {
        ProviderId::Gmaps => (
            "Google Maps",
            "Google maps and satellite imagery with high quality and global coverage.",
            ["High-resolution imagery", "Global coverage", "Frequent updates"],
        ),
        ProviderId::Mapbox => (
            "Mapbox",
            "Customisable map platform with modern styling and current data.",
            ["Customisable design", "OpenStreetMap data", "Modern API"],
        ),
        ProviderId::Esri => (
            "Esri ArcGIS",
            "GIS industry leader with professional satellite imagery.",
            ["Professional data", "Geospatial analysis", "High-quality imagery"],
        ),
        ProviderId::Here => (
            "HERE Maps",
            "Maps and location data from HERE Technologies, focused on navigation.",
            ["Traffic data", "Precise navigation", "Global coverage"],
        ),
        ProviderId::Osm => (
            "OpenStreetMap",
            "Collaborative world map built by a community of volunteers.",
            ["Open source", "Collaborative data", "Community updates"],
        ),
    };

    ProviderInfo {
        id,
        name,
        description,
        features,
        shortcut: char::from_digit(id.ordinal() as u32, 10).unwrap_or('?'),
    }
}
