//! Decoded nearby-search response body.

use serde::{Deserialize, Serialize};

/// Top-level nearby-search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacesResponse {
    /// API status, e.g. `OK`, `ZERO_RESULTS`, `REQUEST_DENIED`.
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Present when more pages exist. Never followed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub html_attributions: Vec<String>,
}

impl PlacesResponse {
    /// `true` when the API answered `OK` or `ZERO_RESULTS`.
    pub fn is_success(&self) -> bool {
        matches!(self.status.as_str(), "OK" | "ZERO_RESULTS")
    }
}

/// One establishment in a nearby-search response.
///
/// Only the fields the enrichment keeps are decoded; the rest of the payload is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    #[serde(default)]
    pub business_status: Option<String>,
    /// Location and viewport, kept as raw JSON.
    #[serde(default)]
    pub geometry: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<serde_json::Value>,
    pub place_id: String,
    #[serde(default)]
    pub price_level: Option<i64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub user_ratings_total: Option<i64>,
    #[serde(default)]
    pub vicinity: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "html_attributions": [],
        "next_page_token": "abc",
        "results": [
            {
                "business_status": "OPERATIONAL",
                "geometry": {
                    "location": {"lat": -23.5614, "lng": -46.6559},
                    "viewport": {
                        "northeast": {"lat": -23.56, "lng": -46.65},
                        "southwest": {"lat": -23.57, "lng": -46.66}
                    }
                },
                "icon": "https://maps.gstatic.com/x.png",
                "name": "Padaria Central",
                "opening_hours": {"open_now": true},
                "place_id": "ChIJ1",
                "price_level": 2,
                "rating": 4.5,
                "types": ["bakery", "food", "store"],
                "user_ratings_total": 120,
                "vicinity": "Av. Paulista, 100"
            },
            {
                "geometry": {"location": {"lat": 1.5, "lng": 2.5}},
                "name": "Bare",
                "place_id": "ChIJ2"
            }
        ],
        "status": "OK"
    }"#;

    #[test]
    fn decodes_full_and_sparse_results() {
        let resp: PlacesResponse = serde_json::from_str(BODY).unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.next_page_token.as_deref(), Some("abc"));
        assert_eq!(resp.results.len(), 2);

        let first = &resp.results[0];
        assert_eq!(first.business_status.as_deref(), Some("OPERATIONAL"));
        assert_eq!(first.price_level, Some(2));
        assert_eq!(first.types, vec!["bakery", "food", "store"]);

        let second = &resp.results[1];
        assert_eq!(second.rating, None);
        assert!(second.types.is_empty());
        assert!(second.opening_hours.is_none());
    }

    #[test]
    fn error_status_without_results_decodes() {
        let resp: PlacesResponse = serde_json::from_str(
            r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid.", "results": []}"#,
        )
        .unwrap();
        assert!(!resp.is_success());
        assert!(resp.results.is_empty());
        assert_eq!(resp.error_message.as_deref(), Some("The provided API key is invalid."));
    }
}
