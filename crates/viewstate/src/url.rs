//! Query-string codec for the shareable URL.
//!
//! `?m=<provider>&t=<s|p>&lat=<deg>&lng=<deg>&z=<zoom>`
//!
//! [`decode`] never fails: each missing, unparseable or out-of-range field
//! falls back to its default on its own, so one bad parameter does not
//! discard the others. Floats are written with Rust's shortest round-trip
//! formatting, which makes `decode(&encode(s)) == s` hold exactly.

use std::str::FromStr;

use foundation::geo::{is_valid_lat, is_valid_lng};
use url::form_urlencoded;

use crate::provider::{LayerType, ProviderId};
use crate::state::{MAX_ZOOM, ViewState};

pub const PARAM_PROVIDER: &str = "m";
pub const PARAM_LAYER: &str = "t";
pub const PARAM_LAT: &str = "lat";
pub const PARAM_LNG: &str = "lng";
pub const PARAM_ZOOM: &str = "z";

/// Encodes `state` as a query string without the leading `?`.
pub fn encode(state: &ViewState) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair(PARAM_PROVIDER, state.provider.code())
        .append_pair(PARAM_LAYER, state.layer.code())
        .append_pair(PARAM_LAT, &state.lat.to_string())
        .append_pair(PARAM_LNG, &state.lng.to_string())
        .append_pair(PARAM_ZOOM, &state.zoom.to_string())
        .finish()
}

/// Decodes a query string, with or without the leading `?`.
pub fn decode(query: &str) -> ViewState {
    let defaults = ViewState::default();
    let params = Params::parse(query);

    ViewState {
        provider: params
            .field(PARAM_PROVIDER, ProviderId::from_code)
            .unwrap_or(defaults.provider),
        layer: params
            .field(PARAM_LAYER, LayerType::from_code)
            .unwrap_or(defaults.layer),
        lat: params
            .field(PARAM_LAT, |v| parse_in(v, is_valid_lat))
            .unwrap_or(defaults.lat),
        lng: params
            .field(PARAM_LNG, |v| parse_in(v, is_valid_lng))
            .unwrap_or(defaults.lng),
        zoom: params
            .field(PARAM_ZOOM, parse_zoom)
            .unwrap_or(defaults.zoom),
    }
}

/// `base` followed by `?` and the encoded state.
pub fn share_url(base: &str, state: &ViewState) -> String {
    let base = base.split(['?', '#']).next().unwrap_or(base);
    format!("{base}?{}", encode(state))
}

fn parse_in(value: &str, valid: fn(f64) -> bool) -> Option<f64> {
    f64::from_str(value).ok().filter(|v| valid(*v))
}

/// Fractional zooms round to the nearest level, the same way map moves do.
fn parse_zoom(value: &str) -> Option<u8> {
    let z = f64::from_str(value).ok().filter(|z| z.is_finite())?.round();
    (0.0..=f64::from(MAX_ZOOM)).contains(&z).then_some(z as u8)
}

struct Params(Vec<(String, String)>);

impl Params {
    fn parse(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        Self(
            form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.trim().to_string()))
                .collect(),
        )
    }

    /// First occurrence of `key`, parsed. Logs the fallback when present but unusable.
    fn field<T>(&self, key: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        let (_, raw) = self.0.iter().find(|(k, _)| k == key)?;
        let parsed = parse(raw);
        if parsed.is_none() {
            tracing::debug!(param = key, value = %raw, "unusable url parameter, using default");
        }
        parsed
    }
}
