//! In-memory table transformations.
//!
//! The processing layer operates on [`crate::types::DataSet`] values:
//!
//! - [`assemble()`]: labelled columns into a table
//! - [`group_unique()`]: group by a key, collecting distinct values per group
//! - [`add_coordinates()`] / [`extract_coordinates()`]: `(lat, lon)` from geometry text
//! - [`drop_duplicates()`]: first row per key
//! - [`left_join()`]: null-filling left join on a key column
//! - [`treat_data()`]: all of the above, one row per establishment
//!
//! ## Example: observations → establishments
//!
//! ```rust
//! use places_enrichment::accumulate::OBSERVATION_FIELDS;
//! use places_enrichment::processing::{assemble, treat_data};
//! use places_enrichment::types::Value;
//!
//! let text = |s: &str| Value::Utf8(s.to_string());
//! let geometry = r#"{"location":{"lat":-23.56,"lng":-46.65}}"#;
//! let columns = vec![
//!     vec![text("OPERATIONAL"), text("OPERATIONAL")],          // business_status
//!     vec![text(geometry), text(geometry)],                    // geometry
//!     vec![text("Padaria"), text("Padaria")],                  // name
//!     vec![Value::Null, Value::Null],                          // opening_hours
//!     vec![text("p1"), text("p1")],                            // place_id
//!     vec![Value::Int64(1), Value::Int64(1)],                  // price_level
//!     vec![Value::Float64(4.6), Value::Float64(4.6)],          // rating
//!     vec![Value::Utf8List(vec![]), Value::Utf8List(vec![])],  // types
//!     vec![Value::Int64(80), Value::Int64(80)],                // user_ratings_total
//!     vec![text("Av. Paulista"), text("Av. Paulista")],        // vicinity
//!     vec![text("bakery"), text("cafe")],                      // category
//! ];
//!
//! let observations = assemble(&OBSERVATION_FIELDS, columns).unwrap();
//! let establishments = treat_data(&observations).unwrap();
//!
//! assert_eq!(establishments.row_count(), 1);
//! assert_eq!(
//!     establishments.rows[0][1],
//!     Value::Utf8List(vec!["bakery".to_string(), "cafe".to_string()])
//! );
//! assert_eq!(establishments.rows[0][2], Value::Float64(-23.56));
//! ```

pub mod assemble;
pub mod coordinates;
pub mod dedup;
pub mod group;
pub mod join;
pub mod treat;

pub use assemble::assemble;
pub use coordinates::{add_coordinates, extract_coordinates, numeric_tokens};
pub use dedup::drop_duplicates;
pub use group::group_unique;
pub use join::{left_join, LeftJoin};
pub use treat::{establishment_records, treat_data, EstablishmentRecord, ESTABLISHMENT_FIELDS};
