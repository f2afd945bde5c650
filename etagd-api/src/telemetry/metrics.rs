//! Prometheus Metrics Definitions
//!
//! Exposes a /metrics endpoint for Prometheus scraping.

use axum::{http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
/// Covers: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0,
];

/// Global metrics instance - initialized once on first use
pub static METRICS: Lazy<ApiResult<EtagdMetrics>> = Lazy::new(EtagdMetrics::new);

/// Outcome labels of the conditional pipeline.
pub mod outcome {
    pub const ADMITTED: &str = "admitted";
    pub const PRECONDITION_REQUIRED: &str = "precondition_required";
    pub const PRECONDITION_FAILED: &str = "precondition_failed";
    pub const NOT_MODIFIED: &str = "not_modified";
    pub const VALIDATOR_ISSUED: &str = "validator_issued";
}

#[derive(Clone)]
pub struct EtagdMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// Conditional pipeline decisions - labels: outcome
    pub conditional_outcomes_total: CounterVec,
}

impl EtagdMetrics {
    /// Create and register all metrics with Prometheus.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "etagd_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_requests_total: {}", e)))?,

            http_request_duration_seconds: register_histogram_vec!(
                "etagd_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_request_duration_seconds: {}", e)))?,

            conditional_outcomes_total: register_counter_vec!(
                "etagd_conditional_outcomes_total",
                "Decisions taken by the conditional request pipeline",
                &["outcome"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register conditional_outcomes_total: {}", e)))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Record a conditional pipeline decision.
    pub fn record_conditional(&self, outcome: &str) {
        self.conditional_outcomes_total
            .with_label_values(&[outcome])
            .inc();
    }
}

/// Record a conditional decision on the global registry, if it initialized.
pub fn record_conditional(outcome: &str) {
    if let Ok(metrics) = METRICS.as_ref() {
        metrics.record_conditional(outcome);
    }
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Observability",
    responses(
        (status = 200, description = "Prometheus metrics in text format", content_type = "text/plain"),
        (status = 500, description = "Failed to encode metrics"),
    ),
)]
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::core::Collector;

    fn metrics() -> Result<&'static EtagdMetrics, String> {
        METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))
    }

    #[test]
    fn test_metrics_creation() -> Result<(), String> {
        let metrics = metrics()?;
        assert!(!metrics.http_requests_total.desc().is_empty());
        Ok(())
    }

    #[test]
    fn test_record_conditional_counts() -> Result<(), String> {
        let metrics = metrics()?;
        let before = metrics
            .conditional_outcomes_total
            .with_label_values(&[outcome::NOT_MODIFIED])
            .get();
        record_conditional(outcome::NOT_MODIFIED);
        let after = metrics
            .conditional_outcomes_total
            .with_label_values(&[outcome::NOT_MODIFIED])
            .get();
        assert!(after >= before + 1.0);
        Ok(())
    }

    #[test]
    fn test_record_http_request() -> Result<(), String> {
        let metrics = metrics()?;
        metrics.record_http_request("GET", "/etag", 200, 0.002);
        Ok(())
    }
}
