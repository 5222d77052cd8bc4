//! Course Search Server
//!
//! HTTP service for course discovery with:
//! - Filtered, sorted, paginated course search
//! - Title suggestions for partial input
//! - Elasticsearch or in-memory document storage
//! - Startup indexing of sample data

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod services;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
