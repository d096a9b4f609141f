//! Prometheus metrics for the gateway.

use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return the handle that renders it.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "facelens_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "facelens_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "facelens_http_requests_in_flight";

    // Analyzer metrics
    pub const ANALYZER_CALLS_TOTAL: &str = "facelens_analyzer_calls_total";
    pub const ANALYZER_DURATION_SECONDS: &str = "facelens_analyzer_duration_seconds";

    // Errors returned to callers, by type
    pub const ERRORS_TOTAL: &str = "facelens_errors_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "facelens_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", route_label(path).to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record one call to the face analyzer.
pub fn record_analyzer_call(operation: &str, success: bool, duration_secs: f64) {
    // Outcome is coarse; error details go to the logs
    let labels = [
        ("operation", operation.to_string()),
        ("outcome", if success { "ok" } else { "error" }.to_string()),
    ];
    counter!(names::ANALYZER_CALLS_TOTAL, &labels).increment(1);
    histogram!(names::ANALYZER_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record an error response by public error type.
pub fn record_error(error_type: &str) {
    let labels = [("type", error_type.to_string())];
    counter!(names::ERRORS_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", route_label(endpoint).to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Fixed label for a request path, so unknown paths cannot grow label sets.
fn route_label(path: &str) -> &'static str {
    // Known routes keep their path, everything else collapses to one label
    match path {
        "/detect" => "/detect",
        "/compare" => "/compare",
        "/health" => "/health",
        "/healthz" => "/healthz",
        "/ready" => "/ready",
        "/metrics" => "/metrics",
        _ => "other",
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    // Increment in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    // Decrement in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}
