//! Blocking places API client.

use std::fmt;
use std::sync::Arc;

use crate::error::EnrichmentResult;
use crate::observability::{
    report, EnrichmentContext, EnrichmentObserver, EnrichmentSeverity, EnrichmentStage,
};

use super::config::PlacesConfig;
use super::response::PlacesResponse;
use super::url::redact_key;

/// Places API client (blocking, no async runtime required).
///
/// There is no retry or rate limiting; a transport or decode failure is returned to the caller
/// as-is.
#[derive(Clone)]
pub struct PlacesClient {
    http: reqwest::blocking::Client,
    observer: Option<Arc<dyn EnrichmentObserver>>,
    alert_at_or_above: EnrichmentSeverity,
}

impl fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacesClient")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl PlacesClient {
    /// Create a client honoring `config.timeout`.
    pub fn new(config: &PlacesConfig) -> EnrichmentResult<Self> {
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(format!("places-enrichment/{}", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_http_client(builder.build()?))
    }

    /// Wrap an already configured HTTP client (custom TLS, proxy or timeout settings).
    pub fn with_http_client(http: reqwest::blocking::Client) -> Self {
        Self {
            http,
            observer: None,
            alert_at_or_above: EnrichmentSeverity::Critical,
        }
    }

    /// Attach an observer for request outcomes.
    pub fn with_observer(mut self, observer: Arc<dyn EnrichmentObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Set the severity at which failures are escalated to `on_alert`.
    pub fn with_alert_threshold(mut self, severity: EnrichmentSeverity) -> Self {
        self.alert_at_or_above = severity;
        self
    }

    /// GET `url` and decode the JSON body.
    pub fn call(&self, url: &str) -> EnrichmentResult<PlacesResponse> {
        self.call_with_params(url, &[])
    }

    /// GET `url` with extra query pairs appended, and decode the JSON body.
    ///
    /// The HTTP status code is not checked: the API reports failures through the `status`
    /// field of the body.
    pub fn call_with_params(&self, url: &str, params: &[(&str, &str)]) -> EnrichmentResult<PlacesResponse> {
        let ctx = EnrichmentContext {
            stage: EnrichmentStage::Request,
            target: redact_key(url),
        };

        let result = self.fetch(url, params);
        report(
            self.observer.as_ref(),
            &ctx,
            self.alert_at_or_above,
            &result,
            |resp| resp.results.len(),
        );
        result
    }

    fn fetch(&self, url: &str, params: &[(&str, &str)]) -> EnrichmentResult<PlacesResponse> {
        let mut request = self.http.get(url);
        if !params.is_empty() {
            request = request.query(params);
        }
        let body = request.send()?.bytes()?;
        Ok(serde_json::from_slice(&body)?)
    }
}
