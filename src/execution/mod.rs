//! Parallel fan-out of independent places requests.
//!
//! This module sits beside the sequential [`crate::accumulate::collect_observations`] and
//! provides:
//!
//! - parallel execution of `(location, category)` requests on a rayon pool
//! - a bound on requests in flight
//! - real-time metrics + observer hooks for monitoring
//!
//! Each worker returns its own observations and the results are merged in request order
//! afterwards, so no accumulator is shared between threads.

mod observer;
mod semaphore;

use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::accumulate::{Observation, ObservationAccumulator, PlaceQuery};
use crate::error::EnrichmentResult;
use crate::places::{PlacesClient, PlacesConfig};

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver, StdErrExecutionObserver,
};

use semaphore::Semaphore;

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Upper bound on concurrently executing requests.
    ///
    /// This is an additional throttle on top of `num_threads`, useful to stay under API quotas.
    pub max_in_flight_requests: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        let n = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self {
            num_threads: Some(n),
            max_in_flight_requests: n.max(1),
        }
    }
}

/// Runs places requests concurrently.
pub struct ExecutionEngine {
    pool: ThreadPool,
    opts: ExecutionOptions,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl ExecutionEngine {
    /// Create a new engine with the given options.
    ///
    /// `num_threads == Some(0)` and `max_in_flight_requests == 0` are treated as one.
    pub fn new(opts: ExecutionOptions) -> EnrichmentResult<Self> {
        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1);

        let pool = ThreadPoolBuilder::new().num_threads(n_threads).build()?;

        Ok(Self {
            pool,
            opts,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Issue every query against the places API in parallel and merge the observations.
    ///
    /// If any request fails, the error of the earliest failing query (in `queries` order) is
    /// returned once all in-flight requests have completed.
    pub fn collect_observations_parallel(
        &self,
        client: &PlacesClient,
        config: &PlacesConfig,
        queries: &[PlaceQuery],
    ) -> EnrichmentResult<ObservationAccumulator> {
        self.run(queries, |q| q.fetch(client, config))
    }

    /// Run `fetch` for every query in parallel and merge the results in query order.
    pub fn run<F>(&self, queries: &[PlaceQuery], fetch: F) -> EnrichmentResult<ObservationAccumulator>
    where
        F: Fn(&PlaceQuery) -> EnrichmentResult<Vec<Observation>> + Send + Sync,
    {
        self.pool.install(|| self.run_impl(queries, &fetch))
    }

    fn run_impl(
        &self,
        queries: &[PlaceQuery],
        fetch: &(dyn Fn(&PlaceQuery) -> EnrichmentResult<Vec<Observation>> + Send + Sync),
    ) -> EnrichmentResult<ObservationAccumulator> {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted {
            requests: queries.len(),
        });

        let sem = Semaphore::new(self.opts.max_in_flight_requests);
        let per_query: Vec<EnrichmentResult<Vec<Observation>>> = queries
            .par_iter()
            .enumerate()
            .map(|(index, query)| {
                let permit = sem.acquire();
                if permit.waited > Duration::ZERO {
                    self.metrics.on_throttle_wait(permit.waited);
                    self.emit(ExecutionEvent::ThrottleWaited {
                        duration: permit.waited,
                    });
                }

                self.metrics.on_request_start();
                self.emit(ExecutionEvent::RequestStarted {
                    index,
                    category: query.category.clone(),
                });

                let result = fetch(query);
                match &result {
                    Ok(observations) => {
                        self.metrics.on_request_end(Some(observations.len()));
                        self.emit(ExecutionEvent::RequestFinished {
                            index,
                            observations: observations.len(),
                        });
                    }
                    Err(e) => {
                        self.metrics.on_request_end(None);
                        self.emit(ExecutionEvent::RequestFailed {
                            index,
                            message: e.to_string(),
                        });
                    }
                }
                result
            })
            .collect();

        self.metrics.end_run(start.elapsed());
        self.emit(ExecutionEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });

        let mut acc = ObservationAccumulator::new();
        for result in per_query {
            acc.extend(result?);
        }
        Ok(acc)
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(o) = &self.observer {
            o.on_event(&event);
        }
    }
}
