//! Observer hooks for reading source tables and calling the places API.
//!
//! Observers receive a callback for every successful or failed stage, plus an alert callback
//! when a failure meets the configured severity threshold.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::EnrichmentError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EnrichmentSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (I/O or transport failures).
    Critical,
}

impl EnrichmentSeverity {
    /// Severity assigned to a failed stage.
    pub fn for_error(e: &EnrichmentError) -> Self {
        match e {
            EnrichmentError::Io(_) | EnrichmentError::Http(_) => Self::Critical,
            EnrichmentError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            EnrichmentError::SourceUnavailable { source, .. } => Self::for_error(source),
            _ => Self::Error,
        }
    }
}

impl fmt::Display for EnrichmentSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        })
    }
}

/// Which step of the enrichment run an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentStage {
    /// Loading the delimited source table.
    ReadSource,
    /// One places API request.
    Request,
}

impl EnrichmentStage {
    /// What `EnrichmentStats::rows` counts for this stage.
    pub fn unit(self) -> &'static str {
        match self {
            Self::ReadSource => "rows",
            Self::Request => "results",
        }
    }
}

impl fmt::Display for EnrichmentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReadSource => "read_source",
            Self::Request => "request",
        })
    }
}

/// Context about an observed stage.
#[derive(Debug, Clone)]
pub struct EnrichmentContext {
    /// Stage that produced the event.
    pub stage: EnrichmentStage,
    /// File path or request URL (API key redacted).
    pub target: String,
}

/// Minimal stats reported on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentStats {
    /// Rows read, or results returned by the API.
    pub rows: usize,
}

/// Observer interface for enrichment outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait EnrichmentObserver: Send + Sync {
    /// Called when a stage succeeds.
    fn on_success(&self, _ctx: &EnrichmentContext, _stats: EnrichmentStats) {}

    /// Called when a stage fails.
    fn on_failure(&self, _ctx: &EnrichmentContext, _severity: EnrichmentSeverity, _error: &EnrichmentError) {}

    /// Called when a failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &EnrichmentContext, severity: EnrichmentSeverity, error: &EnrichmentError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Report the outcome of a stage to `observer`, alerting at or above `alert_at_or_above`.
pub(crate) fn report<T>(
    observer: Option<&Arc<dyn EnrichmentObserver>>,
    ctx: &EnrichmentContext,
    alert_at_or_above: EnrichmentSeverity,
    result: &Result<T, EnrichmentError>,
    rows: impl FnOnce(&T) -> usize,
) {
    let Some(obs) = observer else {
        return;
    };
    match result {
        Ok(v) => obs.on_success(ctx, EnrichmentStats { rows: rows(v) }),
        Err(e) => {
            let sev = EnrichmentSeverity::for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }
}

/// Forwards every callback to each observer, in the order they were added.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn EnrichmentObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn EnrichmentObserver>>) -> Self {
        Self { observers }
    }

    /// Add one more observer.
    pub fn with(mut self, observer: Arc<dyn EnrichmentObserver>) -> Self {
        self.observers.push(observer);
        self
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl EnrichmentObserver for CompositeObserver {
    fn on_success(&self, ctx: &EnrichmentContext, stats: EnrichmentStats) {
        self.observers.iter().for_each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &EnrichmentContext, severity: EnrichmentSeverity, error: &EnrichmentError) {
        self.observers.iter().for_each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &EnrichmentContext, severity: EnrichmentSeverity, error: &EnrichmentError) {
        self.observers.iter().for_each(|o| o.on_alert(ctx, severity, error));
    }
}

/// One line per event on stderr, e.g.
/// `[places] request ok rows=20 target=https://...&key=***&...`.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl EnrichmentObserver for StdErrObserver {
    fn on_success(&self, ctx: &EnrichmentContext, stats: EnrichmentStats) {
        eprintln!("[places] {} ok {}={} target={}", ctx.stage, ctx.stage.unit(), stats.rows, ctx.target);
    }

    fn on_failure(&self, ctx: &EnrichmentContext, severity: EnrichmentSeverity, error: &EnrichmentError) {
        eprintln!("[places] {} {severity} target={} err={error}", ctx.stage, ctx.target);
    }

    fn on_alert(&self, ctx: &EnrichmentContext, severity: EnrichmentSeverity, error: &EnrichmentError) {
        eprintln!("[places][ALERT] {} {severity} target={} err={error}", ctx.stage, ctx.target);
    }
}

/// Appends tab-separated events to a local log file:
/// `unix_ts  stage  outcome  target  detail`.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Failures to open or write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, ctx: &EnrichmentContext, outcome: &str, detail: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{}\t{}\t{outcome}\t{}\t{detail}", unix_ts(), ctx.stage, ctx.target);
        }
    }
}

impl EnrichmentObserver for FileObserver {
    fn on_success(&self, ctx: &EnrichmentContext, stats: EnrichmentStats) {
        self.append(ctx, "ok", &format!("{}={}", ctx.stage.unit(), stats.rows));
    }

    fn on_failure(&self, ctx: &EnrichmentContext, severity: EnrichmentSeverity, error: &EnrichmentError) {
        self.append(ctx, &severity.to_string(), &error.to_string());
    }

    fn on_alert(&self, ctx: &EnrichmentContext, severity: EnrichmentSeverity, error: &EnrichmentError) {
        self.append(ctx, &format!("alert:{severity}"), &error.to_string());
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
