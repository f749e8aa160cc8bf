//! Source table entrypoint.
//!
//! [`read_source_table`] loads a named delimited file into a [`DataSet`]. A file that cannot be
//! opened or read comes back as [`EnrichmentError::SourceUnavailable`], so callers match on the
//! `Result` instead of inspecting the shape of the return value.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{EnrichmentError, EnrichmentResult};
use crate::observability::{
    report, EnrichmentContext, EnrichmentObserver, EnrichmentSeverity, EnrichmentStage,
};
use crate::types::DataSet;

use super::csv::{read_csv_inferred, reader_with_separator};

/// Default column separator for source tables.
pub const DEFAULT_SEPARATOR: u8 = b';';

/// Options controlling source table reading.
#[derive(Clone)]
pub struct ReadOptions {
    /// Single-byte column separator.
    pub separator: u8,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn EnrichmentObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: EnrichmentSeverity,
}

impl fmt::Debug for ReadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOptions")
            .field("separator", &(self.separator as char))
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            observer: None,
            alert_at_or_above: EnrichmentSeverity::Critical,
        }
    }
}

/// Read the delimited file at `path`, identified as `name` in error messages.
///
/// Column types are inferred (see [`read_csv_inferred`]).
///
/// ```no_run
/// use places_enrichment::ingestion::{read_source_table, ReadOptions};
///
/// match read_source_table("stores", "data/stores.csv", &ReadOptions::default()) {
///     Ok(ds) => println!("rows={}", ds.row_count()),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
pub fn read_source_table(
    name: &str,
    path: impl AsRef<Path>,
    options: &ReadOptions,
) -> EnrichmentResult<DataSet> {
    let path = path.as_ref();
    let ctx = EnrichmentContext {
        stage: EnrichmentStage::ReadSource,
        target: path.display().to_string(),
    };

    let result = read_delimited(path, options.separator).map_err(|e| match e {
        EnrichmentError::Io(_) | EnrichmentError::Csv(_) => EnrichmentError::SourceUnavailable {
            name: name.to_string(),
            path: path.to_path_buf(),
            source: Box::new(e),
        },
        other => other,
    });

    report(
        options.observer.as_ref(),
        &ctx,
        options.alert_at_or_above,
        &result,
        DataSet::row_count,
    );

    result
}

fn read_delimited(path: &Path, separator: u8) -> EnrichmentResult<DataSet> {
    let file = File::open(path)?;
    let mut rdr = reader_with_separator(file, separator);
    read_csv_inferred(&mut rdr)
}

/// Owned read request, convenient for queueing several source tables.
#[derive(Debug, Clone)]
pub struct SourceTable {
    /// Name used in error messages.
    pub name: String,
    /// Path to the delimited file.
    pub path: PathBuf,
    /// Options controlling reading.
    pub options: ReadOptions,
}

impl SourceTable {
    /// Execute the request by calling [`read_source_table`].
    pub fn read(&self) -> EnrichmentResult<DataSet> {
        read_source_table(&self.name, &self.path, &self.options)
    }
}
