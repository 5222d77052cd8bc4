use anyhow::Context as _;
use axum::http::StatusCode;
use serde_json::Value;

/// Course IDs of a search response, in response order
pub fn course_ids(body: &Value) -> anyhow::Result<Vec<String>> {
    let courses = body
        .get("courses")
        .and_then(|v| v.as_array())
        .context("courses is array")?;
    Ok(courses
        .iter()
        .filter_map(|c| c.get("id").and_then(|v| v.as_str()).map(str::to_string))
        .collect())
}

/// `total` of a search response
pub fn total(body: &Value) -> anyhow::Result<u64> {
    body.get("total")
        .and_then(|v| v.as_u64())
        .context("total is integer")
}

/// Suggestions of a suggest response, in response order
pub fn suggestions(body: &Value) -> anyhow::Result<Vec<String>> {
    let suggestions = body
        .get("suggestions")
        .and_then(|v| v.as_array())
        .context("suggestions is array")?;
    Ok(suggestions
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect())
}

/// Assert the `{timestamp, status, error, message}` error body
pub fn assert_error_body(body: &Value, status: StatusCode, message: &str) {
    assert_eq!(body["status"].as_u64(), Some(u64::from(status.as_u16())));
    assert_eq!(
        body["error"].as_str(),
        status.canonical_reason(),
        "unexpected error phrase in {body}"
    );
    assert_eq!(
        body["message"].as_str(),
        Some(message),
        "unexpected message in {body}"
    );
    assert!(
        body["timestamp"].as_str().is_some_and(|t| !t.is_empty()),
        "missing timestamp in {body}"
    );
}
