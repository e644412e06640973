//! # Prometheus Metrics
//!
//! Prometheus registry for the gateway, exposed via the `prometheus` crate.
//!
//! HTTP-level metrics (request counts, latency, errors) are recorded in
//! middleware. Transition outcomes are recorded by the transition handler.
//! The resident-actor gauge is updated on each `/metrics` scrape (pull
//! model) — see the metrics handler in `lib.rs`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{
    Encoder, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder, core::Collector,
};

/// Shared metrics state backed by a Prometheus registry.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,

    // -- HTTP middleware metrics (push model) --
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_errors_total: IntCounterVec,

    // -- Lifecycle metrics --
    domain_transitions_total: IntCounterVec,
    domains_resident: prometheus::Gauge,
}

impl std::fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiMetrics")
            .field("requests", &self.requests())
            .field("errors", &self.errors())
            .finish()
    }
}

impl ApiMetrics {
    /// Create a new metrics instance with a fresh Prometheus registry.
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("reg_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let http_request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "reg_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "path"],
        )
        .expect("metric can be created");

        let http_errors_total = IntCounterVec::new(
            Opts::new("reg_http_errors_total", "Total HTTP errors (4xx and 5xx)"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let domain_transitions_total = IntCounterVec::new(
            Opts::new(
                "reg_domain_transitions_total",
                "Lifecycle transitions by source state, target state and outcome",
            ),
            &["from", "to", "outcome"],
        )
        .expect("metric can be created");

        let domains_resident = prometheus::Gauge::new(
            "reg_domains_resident",
            "Domain actors currently resident in memory",
        )
        .expect("metric can be created");

        registry
            .register(Box::new(http_requests_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_errors_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(domain_transitions_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(domains_resident.clone()))
            .expect("metric can be registered");

        Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                http_errors_total,
                domain_transitions_total,
                domains_resident,
            }),
        }
    }

    /// Return current total request count (sum across all labels).
    pub fn requests(&self) -> u64 {
        let mut total = 0u64;
        let families = self.inner.http_requests_total.collect();
        for mf in &families {
            for m in mf.get_metric() {
                total += m.get_counter().get_value() as u64;
            }
        }
        total
    }

    /// Return current total error count (sum across all labels).
    pub fn errors(&self) -> u64 {
        let mut total = 0u64;
        let families = self.inner.http_errors_total.collect();
        for mf in &families {
            for m in mf.get_metric() {
                total += m.get_counter().get_value() as u64;
            }
        }
        total
    }

    /// Record an HTTP request (called by the middleware).
    fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();

        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);

        if status >= 400 {
            self.inner
                .http_errors_total
                .with_label_values(&[method, path, &status_str])
                .inc();
        }
    }

    /// Record a lifecycle transition outcome (called by the transition handler).
    pub fn record_transition(&self, from: &str, to: &str, applied: bool) {
        let outcome = if applied { "applied" } else { "rejected" };
        self.inner
            .domain_transitions_total
            .with_label_values(&[from, to, outcome])
            .inc();
    }

    /// Access the resident-actor gauge for updating on scrape.
    pub fn domains_resident(&self) -> &prometheus::Gauge {
        &self.inner.domains_resident
    }

    /// Gather all metrics and encode to Prometheus text format.
    pub fn gather_and_encode(&self) -> Result<String, String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| format!("failed to encode metrics: {e}"))?;
        String::from_utf8(buffer)
            .map_err(|e| format!("metrics encoding produced invalid UTF-8: {e}"))
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a request path by replacing the domain-name segment with `{name}`.
///
/// Prevents cardinality explosion in Prometheus labels: every registered
/// domain would otherwise mint its own label value.
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let mut out: Vec<&str> = Vec::with_capacity(segments.len());
    let mut after_domains = false;
    for segment in segments {
        if after_domains && !segment.is_empty() {
            out.push("{name}");
            after_domains = false;
        } else {
            after_domains = segment == "domains";
            out.push(segment);
        }
    }
    out.join("/")
}

/// Middleware that records HTTP request metrics via Prometheus.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());
    let start = Instant::now();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        let duration = start.elapsed().as_secs_f64();
        let status = response.status().as_u16();
        m.record_request(&method, &path, status, duration);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_metrics_new_starts_at_zero() {
        let m = ApiMetrics::new();
        assert_eq!(m.requests(), 0);
        assert_eq!(m.errors(), 0);
    }

    #[test]
    fn requests_increments() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/test", 200, 0.01);
        assert_eq!(m.requests(), 1);
        m.record_request("POST", "/test", 201, 0.02);
        m.record_request("GET", "/other", 200, 0.005);
        assert_eq!(m.requests(), 3);
    }

    #[test]
    fn errors_increments() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/test", 500, 0.1);
        assert_eq!(m.errors(), 1);
        m.record_request("GET", "/test", 404, 0.05);
        assert_eq!(m.errors(), 2);
    }

    #[test]
    fn request_and_error_counts_independent() {
        let m = ApiMetrics::new();
        for _ in 0..5 {
            m.record_request("GET", "/ok", 200, 0.01);
        }
        m.record_request("GET", "/fail", 500, 0.1);
        m.record_request("POST", "/fail", 400, 0.05);
        assert_eq!(m.requests(), 7);
        assert_eq!(m.errors(), 2);
    }

    #[test]
    fn concurrent_increments_are_safe() {
        let m = ApiMetrics::new();
        let threads: Vec<_> = (0..10)
            .map(|_| {
                let m = m.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        m.record_request("GET", "/test", 200, 0.001);
                        m.record_request("GET", "/err", 500, 0.001);
                    }
                })
            })
            .collect();

        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(m.requests(), 20_000);
        assert_eq!(m.errors(), 10_000);
    }

    #[test]
    fn clone_shares_underlying_counters() {
        let m = ApiMetrics::new();
        let clone = m.clone();

        m.record_request("GET", "/test", 200, 0.01);
        assert_eq!(clone.requests(), 1, "clone should see the same counter");

        clone.record_request("GET", "/err", 500, 0.01);
        assert_eq!(m.errors(), 1, "original should see clone's increment");
    }

    #[test]
    fn gather_and_encode_produces_text() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/test", 200, 0.01);
        let output = m.gather_and_encode().unwrap();
        assert!(output.contains("reg_http_requests_total"));
        assert!(output.contains("reg_http_request_duration_seconds"));
    }

    #[test]
    fn transition_outcomes_recorded() {
        let m = ApiMetrics::new();
        m.record_transition("available", "registered", true);
        m.record_transition("available", "deleted", false);
        let output = m.gather_and_encode().unwrap();
        assert!(output.contains("reg_domain_transitions_total"));
        assert!(output.contains("outcome=\"applied\""));
        assert!(output.contains("outcome=\"rejected\""));
    }

    #[test]
    fn normalize_path_replaces_domain_name() {
        let path = "/v1/domains/example.com/transition";
        assert_eq!(normalize_path(path), "/v1/domains/{name}/transition");
    }

    #[test]
    fn normalize_path_replaces_bare_domain_name() {
        let path = "/v1/domains/example.com/state";
        assert_eq!(normalize_path(path), "/v1/domains/{name}/state");
    }

    #[test]
    fn normalize_path_preserves_other_segments() {
        assert_eq!(normalize_path("/health/liveness"), "/health/liveness");
        assert_eq!(normalize_path("/metrics"), "/metrics");
    }

    #[test]
    fn normalize_path_without_trailing_segment() {
        assert_eq!(normalize_path("/v1/domains"), "/v1/domains");
    }
}
