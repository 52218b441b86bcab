//! Photon geocoding API client
//!
//! Resolves free-text place queries into coordinates. Results are restricted
//! to populated places (city/town/village) and sorted by country code so the
//! list groups countries together.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::Place;

/// Base URL for the Photon geocoding API
const PHOTON_BASE_URL: &str = "https://photon.komoot.io/api";

/// Language preference for result names
const PHOTON_LANG: &str = "en";

/// Maximum number of results to request
const RESULT_LIMIT: u8 = 10;

/// OSM tags the search is restricted to
const OSM_TAGS: [&str; 3] = ["place:city", "place:town", "place:village"];

/// Errors that can occur when searching for places
#[derive(Debug, Error)]
pub enum PlaceError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Geocoding service returned status {status}")]
    Upstream { status: u16 },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Client for the Photon geocoding API
#[derive(Debug, Clone)]
pub struct PlaceClient {
    client: Client,
    base_url: String,
}

impl Default for PlaceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceClient {
    /// Create a new PlaceClient with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: PHOTON_BASE_URL.to_string(),
        }
    }

    /// Create a client pointed at a different base URL (for tests)
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Search for places matching a free-text query
    ///
    /// # Arguments
    /// * `query` - The text typed by the user
    ///
    /// # Returns
    /// * `Ok(Vec<Place>)` - Matching places, sorted by country code ascending
    /// * `Err(PlaceError)` - If the request or parsing fails
    pub async fn search(&self, query: &str) -> Result<Vec<Place>, PlaceError> {
        let limit = RESULT_LIMIT.to_string();
        let mut params: Vec<(&str, &str)> =
            vec![("q", query), ("lang", PHOTON_LANG), ("limit", &limit)];
        for tag in OSM_TAGS {
            params.push(("osm_tag", tag));
        }

        let response = self.client.get(&self.base_url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlaceError::Upstream {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let photon: PhotonResponse = serde_json::from_str(&text)?;
        Ok(places_from_features(photon))
    }
}

/// Converts a Photon feature collection into sorted places
///
/// Features without a name or a usable point geometry are dropped. A missing
/// country code becomes an empty string, which sorts ahead of real codes.
fn places_from_features(response: PhotonResponse) -> Vec<Place> {
    let mut places: Vec<Place> = response
        .features
        .into_iter()
        .filter_map(|feature| {
            let name = feature.properties.name?;
            let lon = *feature.geometry.coordinates.first()?;
            let lat = *feature.geometry.coordinates.get(1)?;
            Some(Place {
                name,
                countrycode: feature.properties.countrycode.unwrap_or_default(),
                lat,
                lon,
            })
        })
        .collect();

    places.sort_by(|a, b| a.countrycode.cmp(&b.countrycode));
    places
}

/// Photon API response structure (GeoJSON feature collection)
#[derive(Debug, Deserialize)]
struct PhotonResponse {
    #[serde(default)]
    features: Vec<PhotonFeature>,
}

#[derive(Debug, Deserialize)]
struct PhotonFeature {
    properties: PhotonProperties,
    geometry: PhotonGeometry,
}

#[derive(Debug, Deserialize)]
struct PhotonProperties {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    countrycode: Option<String>,
}

/// Point geometry; coordinates are `[lon, lat]`
#[derive(Debug, Deserialize)]
struct PhotonGeometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sample Photon response with results from several countries
    const VALID_RESPONSE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "osm_id": 26686587,
                    "name": "Brest",
                    "countrycode": "FR",
                    "osm_key": "place",
                    "osm_value": "city"
                },
                "geometry": {
                    "type": "Point",
                    "coordinates": [-4.4860088, 48.3905283]
                }
            },
            {
                "type": "Feature",
                "properties": {
                    "osm_id": 288960776,
                    "name": "Brest",
                    "countrycode": "BY",
                    "osm_key": "place",
                    "osm_value": "city"
                },
                "geometry": {
                    "type": "Point",
                    "coordinates": [23.6929345, 52.0975500]
                }
            },
            {
                "type": "Feature",
                "properties": {
                    "osm_id": 1532301,
                    "name": "Brest",
                    "countrycode": "DE",
                    "osm_key": "place",
                    "osm_value": "village"
                },
                "geometry": {
                    "type": "Point",
                    "coordinates": [9.0330392, 53.8471404]
                }
            }
        ]
    }"#;

    #[test]
    fn test_places_sorted_by_country_code() {
        let response: PhotonResponse =
            serde_json::from_str(VALID_RESPONSE).expect("Failed to parse Photon response");
        let places = places_from_features(response);

        assert_eq!(places.len(), 3);
        assert_eq!(places[0].countrycode, "BY");
        assert_eq!(places[1].countrycode, "DE");
        assert_eq!(places[2].countrycode, "FR");
        assert_eq!(places[2].name, "Brest");
        assert!((places[2].lat - 48.3905283).abs() < 1e-6);
        assert!((places[2].lon - (-4.4860088)).abs() < 1e-6);
    }

    #[test]
    fn test_feature_without_name_is_dropped() {
        let response: PhotonResponse = serde_json::from_str(
            r#"{
                "features": [
                    {
                        "properties": {"countrycode": "FR"},
                        "geometry": {"coordinates": [-4.48, 48.39]}
                    },
                    {
                        "properties": {"name": "Quimper", "countrycode": "FR"},
                        "geometry": {"coordinates": [-4.10, 47.99]}
                    }
                ]
            }"#,
        )
        .expect("Failed to parse");

        let places = places_from_features(response);
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Quimper");
    }

    #[test]
    fn test_feature_without_point_geometry_is_dropped() {
        let response: PhotonResponse = serde_json::from_str(
            r#"{
                "features": [
                    {
                        "properties": {"name": "Nowhere", "countrycode": "XX"},
                        "geometry": {"coordinates": []}
                    }
                ]
            }"#,
        )
        .expect("Failed to parse");

        assert!(places_from_features(response).is_empty());
    }

    #[test]
    fn test_missing_country_code_sorts_first() {
        let response: PhotonResponse = serde_json::from_str(
            r#"{
                "features": [
                    {
                        "properties": {"name": "Somewhere", "countrycode": "AT"},
                        "geometry": {"coordinates": [16.37, 48.21]}
                    },
                    {
                        "properties": {"name": "Anon"},
                        "geometry": {"coordinates": [0.0, 0.0]}
                    }
                ]
            }"#,
        )
        .expect("Failed to parse");

        let places = places_from_features(response);
        assert_eq!(places[0].name, "Anon");
        assert_eq!(places[0].countrycode, "");
        assert_eq!(places[1].countrycode, "AT");
    }

    #[test]
    fn test_empty_feature_collection() {
        let response: PhotonResponse =
            serde_json::from_str(r#"{"type": "FeatureCollection", "features": []}"#)
                .expect("Failed to parse");
        assert!(places_from_features(response).is_empty());
    }

    #[tokio::test]
    async fn test_search_surfaces_transport_errors() {
        // Port 9 is unroutable, so the request fails without touching the
        // real geocoding service
        let client = PlaceClient::with_base_url("http://127.0.0.1:9");

        match client.search("brest").await {
            Err(PlaceError::RequestFailed(_)) => {}
            other => panic!("Expected RequestFailed error, got {:?}", other),
        }
    }
}
