//! Places API access: configuration, URL building, the blocking client and response types.
//!
//! ```no_run
//! use places_enrichment::places::{build_url, PlacesClient, PlacesConfig};
//!
//! # fn main() -> Result<(), places_enrichment::EnrichmentError> {
//! let config = PlacesConfig::default();
//! let client = PlacesClient::new(&config)?;
//! let url = build_url(&config, -23.5614, -46.6559, "bakery")?;
//! let response = client.call(&url)?;
//! println!("status={} results={}", response.status, response.results.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod response;
pub mod url;

pub use client::PlacesClient;
pub use config::PlacesConfig;
pub use response::{PlaceResult, PlacesResponse};
pub use url::{build_url, build_url_with_key, redact_key};
