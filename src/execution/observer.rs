use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Events emitted while fanning requests out.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted { requests: usize },
    ThrottleWaited { duration: Duration },
    RequestStarted { index: usize, category: String },
    RequestFinished { index: usize, observations: usize },
    RequestFailed { index: usize, message: String },
    RunFinished {
        elapsed: Duration,
        metrics: ExecutionMetricsSnapshot,
    },
}

/// Observer hook for execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// A simple stderr logger for execution events.
#[derive(Default)]
pub struct StdErrExecutionObserver;

impl ExecutionObserver for StdErrExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        eprintln!("[enrich][exec] {event:?}");
    }
}

/// Live counters for a fan-out run.
///
/// The engine updates these while requests are in flight; callers can snapshot them at any
/// time.
pub struct ExecutionMetrics {
    run_id: AtomicU64,
    elapsed_ns: AtomicU64,

    requests_started: AtomicU64,
    requests_finished: AtomicU64,
    requests_failed: AtomicU64,
    observations: AtomicU64,
    throttle_wait_ns: AtomicU64,

    active_requests: AtomicUsize,
    max_active_requests: AtomicUsize,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self {
            run_id: AtomicU64::new(0),
            elapsed_ns: AtomicU64::new(0),
            requests_started: AtomicU64::new(0),
            requests_finished: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            observations: AtomicU64::new(0),
            throttle_wait_ns: AtomicU64::new(0),
            active_requests: AtomicUsize::new(0),
            max_active_requests: AtomicUsize::new(0),
        }
    }

    pub fn begin_run(&self) {
        let _ = self.run_id.fetch_add(1, Ordering::SeqCst);
        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.requests_started.store(0, Ordering::SeqCst);
        self.requests_finished.store(0, Ordering::SeqCst);
        self.requests_failed.store(0, Ordering::SeqCst);
        self.observations.store(0, Ordering::SeqCst);
        self.throttle_wait_ns.store(0, Ordering::SeqCst);
        self.active_requests.store(0, Ordering::SeqCst);
        self.max_active_requests.store(0, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns.store(as_nanos_u64(elapsed), Ordering::SeqCst);
    }

    pub fn on_request_start(&self) {
        let _ = self.requests_started.fetch_add(1, Ordering::SeqCst);
        let now = self.active_requests.fetch_add(1, Ordering::SeqCst) + 1;
        update_max_usize(&self.max_active_requests, now);
    }

    /// `observations` is `None` when the request failed.
    pub fn on_request_end(&self, observations: Option<usize>) {
        match observations {
            Some(n) => {
                let _ = self.requests_finished.fetch_add(1, Ordering::SeqCst);
                let _ = self.observations.fetch_add(n as u64, Ordering::SeqCst);
            }
            None => {
                let _ = self.requests_failed.fetch_add(1, Ordering::SeqCst);
            }
        }
        let _ = self.active_requests.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn on_throttle_wait(&self, d: Duration) {
        let _ = self.throttle_wait_ns.fetch_add(as_nanos_u64(d), Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        let elapsed = (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns));

        ExecutionMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed,
            requests_started: self.requests_started.load(Ordering::SeqCst),
            requests_finished: self.requests_finished.load(Ordering::SeqCst),
            requests_failed: self.requests_failed.load(Ordering::SeqCst),
            observations: self.observations.load(Ordering::SeqCst),
            throttle_wait: Duration::from_nanos(self.throttle_wait_ns.load(Ordering::SeqCst)),
            max_active_requests: self.max_active_requests.load(Ordering::SeqCst),
        }
    }
}

impl Default for ExecutionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn as_nanos_u64(d: Duration) -> u64 {
    d.as_nanos().min(u64::MAX as u128) as u64
}

fn update_max_usize(dst: &AtomicUsize, now: usize) {
    let _ = dst.fetch_max(now, Ordering::SeqCst);
}

/// Immutable snapshot of [`ExecutionMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub requests_started: u64,
    pub requests_finished: u64,
    pub requests_failed: u64,
    pub observations: u64,
    pub throttle_wait: Duration,
    pub max_active_requests: usize,
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, requests={}/{} (failed={}), observations={}, max_active_requests={}, throttle_wait={:?}, elapsed={:?}",
            self.run_id,
            self.requests_finished,
            self.requests_started,
            self.requests_failed,
            self.observations,
            self.max_active_requests,
            self.throttle_wait,
            self.elapsed
        )
    }
}
