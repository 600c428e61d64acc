//! Request metrics and tracing hooks.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the application.

use crate::errors::{GitHubError, GitHubErrorKind, RateLimitInfo};
use crate::transport::HttpRequest;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace, warn};

/// Which GitHub API a request went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Api {
    /// The v3 REST API, Basic auth.
    Rest,
    /// The GraphQL endpoint, token auth.
    GraphQL,
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Api::Rest => f.write_str("rest"),
            Api::GraphQL => f.write_str("graphql"),
        }
    }
}

/// Counters shared by every request a client makes.
#[derive(Debug, Default)]
pub struct Metrics {
    rest_requests: AtomicU64,
    graphql_requests: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    /// 2xx GraphQL responses that carried an `errors` array.
    graphql_errors: AtomicU64,
    rate_limited: AtomicU64,
    latency_total_us: AtomicU64,
}

impl Metrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    fn count(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads every counter.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let rest = self.rest_requests.load(Ordering::Relaxed);
        let graphql = self.graphql_requests.load(Ordering::Relaxed);
        let succeeded = self.succeeded.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        let finished = succeeded + failed;

        MetricsSnapshot {
            requests_total: rest + graphql,
            rest_requests: rest,
            graphql_requests: graphql,
            requests_success: succeeded,
            requests_failed: failed,
            graphql_errors: self.graphql_errors.load(Ordering::Relaxed),
            requests_rate_limited: self.rate_limited.load(Ordering::Relaxed),
            average_latency_us: self
                .latency_total_us
                .load(Ordering::Relaxed)
                .checked_div(finished)
                .unwrap_or(0),
        }
    }
}

/// Counter values at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub rest_requests: u64,
    pub graphql_requests: u64,
    pub requests_success: u64,
    pub requests_failed: u64,
    pub graphql_errors: u64,
    pub requests_rate_limited: u64,
    pub average_latency_us: u64,
}

/// Times one request and books its outcome.
pub struct RequestTimer {
    start: Instant,
    metrics: Arc<Metrics>,
}

impl RequestTimer {
    /// Counts a request against `api` and starts the clock.
    pub fn start(metrics: Arc<Metrics>, api: Api) -> Self {
        match api {
            Api::Rest => Metrics::count(&metrics.rest_requests),
            Api::GraphQL => Metrics::count(&metrics.graphql_requests),
        }
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    fn stop(&self) -> Duration {
        let elapsed = self.start.elapsed();
        self.metrics
            .latency_total_us
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
        elapsed
    }

    /// Books a success and returns the elapsed time.
    pub fn success(self) -> Duration {
        Metrics::count(&self.metrics.succeeded);
        self.stop()
    }

    /// Books a failure, classified by `error`, and returns the elapsed time.
    pub fn failure(self, error: &GitHubError) -> Duration {
        Metrics::count(&self.metrics.failed);
        if error.is_rate_limited() {
            Metrics::count(&self.metrics.rate_limited);
        }
        if *error.kind() == GitHubErrorKind::QueryError {
            Metrics::count(&self.metrics.graphql_errors);
        }
        self.stop()
    }
}

/// `tracing` events around each call.
pub struct TracingHooks;

impl TracingHooks {
    /// Logs the outgoing request; headers only at `trace`, redacted.
    pub fn on_request_start(api: Api, request: &HttpRequest) {
        debug!(%api, method = %request.method, url = %request.url, "GitHub request started");
        for (name, value) in &request.headers {
            trace!(header = %name, value = %redact_header(name, value));
        }
    }

    /// Logs a 2xx response that normalized cleanly.
    pub fn on_request_complete(api: Api, url: &str, status: u16, duration: Duration) {
        debug!(
            %api,
            url = %url,
            status,
            duration_ms = duration.as_millis() as u64,
            "GitHub request completed"
        );
    }

    /// Logs a failed call. GraphQL `errors` payloads are warnings, everything
    /// else is an error.
    pub fn on_request_error(api: Api, url: &str, error: &GitHubError) {
        if *error.kind() == GitHubErrorKind::QueryError {
            warn!(%api, url = %url, errors = %error.message(), "GraphQL response carried errors");
            return;
        }
        error!(
            %api,
            url = %url,
            kind = %error.kind(),
            status = error.status_code().unwrap_or(0),
            request_id = error.request_id().unwrap_or(""),
            "GitHub request failed"
        );
    }

    /// Logs the rate limit headers of a response.
    pub fn on_rate_limit_update(info: &RateLimitInfo) {
        debug!(
            limit = info.limit,
            remaining = info.remaining,
            reset_at = %info.reset_at,
            resource = info.resource.as_deref().unwrap_or("core"),
            "Rate limit"
        );
    }

    /// Logs a branch protection mutation that went through.
    pub fn on_branch_protection_change(mutation: &str, target: &str) {
        info!(mutation, target, "Branch protection rule changed");
    }
}

/// Header names whose values never reach the logs.
pub const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie"];

/// Returns `value`, or `[REDACTED]` for a sensitive header.
pub fn redact_header(name: &str, value: &str) -> String {
    if SENSITIVE_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name)) {
        "[REDACTED]".to_string()
    } else {
        value.to_string()
    }
}
