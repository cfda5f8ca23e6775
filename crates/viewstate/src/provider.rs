use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownCode;

/// Third-party tile provider.
///
/// Declaration order is the shortcut order: provider N is selected by digit N.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Gmaps,
    Mapbox,
    Esri,
    Here,
    Osm,
}

impl ProviderId {
    pub const ALL: [ProviderId; 5] = [
        ProviderId::Gmaps,
        ProviderId::Mapbox,
        ProviderId::Esri,
        ProviderId::Here,
        ProviderId::Osm,
    ];

    /// Short code used in URLs and persisted entries.
    pub fn code(self) -> &'static str {
        match self {
            ProviderId::Gmaps => "gmaps",
            ProviderId::Mapbox => "mapbox",
            ProviderId::Esri => "esri",
            ProviderId::Here => "here",
            ProviderId::Osm => "osm",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }

    /// 1-based position in [`ProviderId::ALL`].
    pub fn ordinal(self) -> usize {
        self as usize + 1
    }

    pub fn from_ordinal(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ProviderId {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownCode(s.to_string()))
    }
}

/// Satellite imagery or plain street cartography.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LayerType {
    #[serde(rename = "s")]
    Satellite,
    #[serde(rename = "p")]
    Plain,
}

impl LayerType {
    pub const ALL: [LayerType; 2] = [LayerType::Satellite, LayerType::Plain];

    pub fn code(self) -> &'static str {
        match self {
            LayerType::Satellite => "s",
            LayerType::Plain => "p",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }

    pub fn toggled(self) -> Self {
        match self {
            LayerType::Satellite => LayerType::Plain,
            LayerType::Plain => LayerType::Satellite,
        }
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LayerType {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownCode(s.to_string()))
    }
}
