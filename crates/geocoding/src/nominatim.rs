use std::future::Future;

use reqwest::header::USER_AGENT;
use serde::Deserialize;

use crate::error::TransportError;
use crate::place::{Geocoder, Place};

pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_RESULT_LIMIT: usize = 8;
pub const DEFAULT_USER_AGENT: &str = "SatellitesMaps-NextGen/1.0";

/// OpenStreetMap Nominatim search client.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    endpoint: String,
    limit: usize,
    user_agent: String,
}

impl Default for NominatimClient {
    fn default() -> Self {
        Self::new(NOMINATIM_ENDPOINT, DEFAULT_RESULT_LIMIT, DEFAULT_USER_AGENT)
    }
}

impl NominatimClient {
    pub fn new(endpoint: impl Into<String>, limit: usize, user_agent: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            limit,
            user_agent: user_agent.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Geocoder for NominatimClient {
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Place>, TransportError>> {
        let limit = self.limit.to_string();
        let request = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", limit.as_str()),
                ("addressdetails", "1"),
            ])
            .header(USER_AGENT, self.user_agent.as_str());

        async move {
            let resp = request.send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(TransportError::Status(status.as_u16()));
            }
            let body = resp.text().await?;
            parse_results(&body)
        }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimResult {
    place_id: u64,
    lat: String,
    lon: String,
    #[serde(default)]
    name: Option<String>,
    display_name: String,
    #[serde(default)]
    addresstype: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    class: Option<String>,
}

/// Parses a Nominatim `format=json` response body.
///
/// Results with unreadable coordinates are skipped; a body that is not a
/// JSON array of results is a [`TransportError::Decode`].
pub fn parse_results(body: &str) -> Result<Vec<Place>, TransportError> {
    let raw: Vec<NominatimResult> =
        serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))?;

    Ok(raw.into_iter().filter_map(into_place).collect())
}

fn into_place(r: NominatimResult) -> Option<Place> {
    let (Ok(lat), Ok(lng)) = (r.lat.trim().parse::<f64>(), r.lon.trim().parse::<f64>()) else {
        tracing::warn!(place_id = r.place_id, "skipping result with unreadable coordinates");
        return None;
    };

    let name = non_empty(r.name).unwrap_or_else(|| {
        r.display_name
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    });
    let kind = non_empty(r.addresstype)
        .or_else(|| non_empty(r.kind))
        .or_else(|| non_empty(r.class))
        .unwrap_or_default();

    Some(Place {
        id: r.place_id.to_string(),
        name,
        lat,
        lng,
        display_label: r.display_name,
        kind,
    })
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{NominatimClient, parse_results};
    use crate::error::TransportError;
    use crate::place::{Geocoder, Place};
    use axum::Router;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    const PARIS: &str = r#"[
        {"place_id": 88066702, "licence": "ODbL", "osm_type": "relation", "osm_id": 7444,
         "lat": "48.8534951", "lon": "2.3483915", "class": "boundary", "type": "administrative",
         "place_rank": 12, "importance": 0.88, "addresstype": "city", "name": "Paris",
         "display_name": "Paris, Île-de-France, France métropolitaine, France",
         "boundingbox": ["48.8155755", "48.9021560", "2.2241220", "2.4697602"]},
        {"place_id": 2, "lat": "33.66", "lon": "-95.55", "name": "",
         "display_name": "Paris, Lamar County, Texas, United States", "type": "town"},
        {"place_id": 3, "lat": "not a number", "lon": "0", "display_name": "Broken"}
    ]"#;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/search")
    }

    #[test]
    fn parses_names_kinds_and_skips_bad_coordinates() {
        let places = parse_results(PARIS).unwrap();
        assert_eq!(
            places,
            vec![
                Place {
                    id: "88066702".to_string(),
                    name: "Paris".to_string(),
                    lat: 48.8534951,
                    lng: 2.3483915,
                    display_label: "Paris, Île-de-France, France métropolitaine, France"
                        .to_string(),
                    kind: "city".to_string(),
                },
                Place {
                    id: "2".to_string(),
                    name: "Paris".to_string(),
                    lat: 33.66,
                    lng: -95.55,
                    display_label: "Paris, Lamar County, Texas, United States".to_string(),
                    kind: "town".to_string(),
                },
            ]
        );
    }

    #[test]
    fn non_array_body_is_a_decode_error() {
        assert!(matches!(
            parse_results(r#"{"error": "rate limited"}"#),
            Err(TransportError::Decode(_))
        ));
        assert_eq!(parse_results("[]").unwrap(), Vec::<Place>::new());
    }

    #[tokio::test]
    async fn client_sends_query_parameters() {
        let app = Router::new().route(
            "/search",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let ok = params.get("format").map(String::as_str) == Some("json")
                    && params.get("limit").map(String::as_str) == Some("8")
                    && params.get("addressdetails").map(String::as_str) == Some("1");
                if !ok {
                    return (StatusCode::BAD_REQUEST, String::new());
                }
                let q = params.get("q").cloned().unwrap_or_default();
                let body = format!(
                    r#"[{{"place_id": 1, "lat": "1.5", "lon": "2.5", "display_name": "{q}, Somewhere"}}]"#
                );
                (StatusCode::OK, body)
            }),
        );
        let client = NominatimClient::new(serve(app).await, 8, "test-agent");

        let places = client.search("Lisbon").await.unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Lisbon");
        assert_eq!((places[0].lat, places[0].lng), (1.5, 2.5));
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let app = Router::new().route(
            "/search",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let client = NominatimClient::new(serve(app).await, 8, "test-agent");

        assert_eq!(
            client.search("Rome").await,
            Err(TransportError::Status(429))
        );
    }
}
