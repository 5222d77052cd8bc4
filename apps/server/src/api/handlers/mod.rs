//! Request handlers for API endpoints
//!
//! Handlers parse the request, call the search service and let
//! [`crate::Error`] shape failures.

pub mod metrics;
pub mod search;

pub use metrics::*;
pub use search::*;
