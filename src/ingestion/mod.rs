//! Source table reading.
//!
//! Most callers should use [`read_source_table`] (from [`source`]) which:
//!
//! - reads a delimited file (default separator `;`) into an in-memory [`crate::types::DataSet`]
//! - infers column types from the data
//! - optionally reports success/failure/alerts to an [`crate::observability::EnrichmentObserver`]
//!
//! Reader-level helpers, including schema-driven reading, live in [`csv`].

pub mod csv;
pub mod source;

pub use source::{read_source_table, ReadOptions, SourceTable, DEFAULT_SEPARATOR};
