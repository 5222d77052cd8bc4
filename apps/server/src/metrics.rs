//! Metrics collection for the course search server
//!
//! Prometheus metrics registered in the default registry and exposed at `/metrics`.

use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

lazy_static! {
    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "course_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "course_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    /// Search and suggest operations by outcome
    pub static ref SEARCH_TOTAL: IntCounterVec = register_int_counter_vec!(
        "course_search_total",
        "Total number of search and suggest operations",
        &["operation", "status"]
    )
    .expect("Failed to register SEARCH_TOTAL");

    /// Courses or suggestions returned per operation
    pub static ref SEARCH_RESULTS: HistogramVec = register_histogram_vec!(
        "course_search_results",
        "Number of items returned per operation",
        &["operation"],
        vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 500.0, 1000.0]
    )
    .expect("Failed to register SEARCH_RESULTS");

    /// Document store query duration
    pub static ref STORE_QUERY_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "course_store_query_duration_seconds",
        "Document store query duration in seconds",
        &["operation"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]
    )
    .expect("Failed to register STORE_QUERY_DURATION_SECONDS");
}

/// Outcome label for operation counters.
pub fn outcome_label<T, E>(result: &Result<T, E>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(_) => "error",
    }
}

/// Collapse unknown paths into one label to bound cardinality.
pub fn sanitize_path(path: &str) -> String {
    let trimmed = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };
    match trimmed {
        "/" | "/health" | "/metrics" | "/api/search" | "/api/search/suggest" => trimmed.to_string(),
        _ => "/{other}".to_string(),
    }
}
