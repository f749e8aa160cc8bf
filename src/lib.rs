//! `places-enrichment` enriches establishment datasets with results from a places-search API
//! (Google Places nearby search) and reshapes them into one analysis-ready row per
//! establishment.
//!
//! The pipeline, leaves first:
//!
//! 1. [`ingestion::read_source_table`] loads a delimited source table (default separator `;`).
//! 2. [`places::build_url`] + [`places::PlacesClient::call`] query the API for one
//!    `(lat, lon, category)` triple.
//! 3. [`accumulate::ObservationAccumulator`] collects one [`accumulate::Observation`] per
//!    result per queried category.
//! 4. [`processing::assemble`] turns labelled columns into a [`types::DataSet`].
//! 5. [`processing::treat_data`] collapses the observation table into one row per `place_id`,
//!    with the distinct categories, `lat`/`lon` parsed from the geometry, and the remaining
//!    details of the first observation.
//!
//! ## Quick example: query, accumulate, treat
//!
//! ```no_run
//! use places_enrichment::accumulate::{collect_observations, PlaceQuery};
//! use places_enrichment::places::{PlacesClient, PlacesConfig};
//! use places_enrichment::processing::treat_data;
//!
//! # fn main() -> Result<(), places_enrichment::EnrichmentError> {
//! // The API key is read from the `KEY` environment variable.
//! let config = PlacesConfig::default();
//! let client = PlacesClient::new(&config)?;
//!
//! let queries = vec![
//!     PlaceQuery::new(-23.5614, -46.6559, "bakery"),
//!     PlaceQuery::new(-23.5614, -46.6559, "cafe"),
//! ];
//! let observations = collect_observations(&client, &config, &queries)?.to_dataset()?;
//! let establishments = treat_data(&observations)?;
//! println!("establishments={}", establishments.row_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Reading the source table
//!
//! ```no_run
//! use places_enrichment::ingestion::{read_source_table, ReadOptions};
//!
//! match read_source_table("stores", "data/stores.csv", &ReadOptions::default()) {
//!     Ok(ds) => println!("rows={}", ds.row_count()),
//!     // e.g. "[ERROR] stores file not found. (data/stores.csv): io error: ..."
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: delimited source table reading
//! - [`places`]: configuration, URL building, blocking client, response types
//! - [`accumulate`]: observation records and their accumulation
//! - [`processing`]: table assembly and the reshaping/deduplication stages
//! - [`execution`]: parallel request fan-out with throttling and metrics
//! - [`observability`]: observer hooks for reads and requests
//! - [`types`]: schema + in-memory dataset types
//! - [`error`]: the crate error type

pub mod accumulate;
pub mod error;
pub mod execution;
pub mod ingestion;
pub mod observability;
pub mod places;
pub mod processing;
pub mod types;

pub use error::{EnrichmentError, EnrichmentResult};
