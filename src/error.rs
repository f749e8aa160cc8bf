use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for enrichment operations.
pub type EnrichmentResult<T> = Result<T, EnrichmentError>;

/// Error type returned across reading, requesting, assembling and treating data.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// The named source table could not be opened or read.
    #[error("[ERROR] {name} file not found. ({}): {source}", path.display())]
    SourceUnavailable {
        name: String,
        path: PathBuf,
        #[source]
        source: Box<EnrichmentError>,
    },

    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Transport-level failure talking to the places API.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The worker pool for parallel requests could not be built.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The API key environment variable is not set.
    #[error("api key environment variable '{var}' is not set")]
    MissingApiKey { var: String },

    /// Fewer than two numeric tokens were found in a geometry value.
    #[error("malformed geometry for place_id '{place_id}': expected 2 numbers, found {found} (raw='{raw}')")]
    MalformedGeometry {
        place_id: String,
        raw: String,
        found: usize,
    },

    /// Columns handed to the table assembler have different lengths.
    #[error("column length mismatch: column '{column}' has {actual} values, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// The input does not have the expected shape (missing columns, lost join matches, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}
