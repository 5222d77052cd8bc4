//! Document store port and its adapters
//!
//! The search core depends only on [`DocumentStore::execute`]. Index
//! management is used by startup bootstrap.

pub mod elasticsearch;
pub mod memory;

mod escape;

use async_trait::async_trait;
use course_query::{Course, CourseQuery};
use thiserror::Error;

pub use elasticsearch::ElasticsearchStore;
pub use memory::InMemoryStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Hits for one query, in store-determined order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreHits {
    /// Number of matching documents across all pages.
    pub total_hits: u64,
    pub hits: Vec<Course>,
}

/// Opaque failure of the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("unexpected store response: {0}")]
    Decode(String),

    #[error("store transport error: {0}")]
    Transport(#[from] ::elasticsearch::Error),
}

/// Storage backend for course documents.
///
/// Any backend (Elasticsearch, in-memory, HTTP proxy, ...) can implement this
/// trait. Implementations honor their own timeouts and cancellation.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Run a query and return the matching page with the total hit count.
    ///
    /// Contains text is matched as given, surrounding whitespace included.
    async fn execute(&self, query: &CourseQuery) -> StoreResult<StoreHits>;

    /// Drop and recreate the course index, discarding all documents.
    async fn recreate_index(&self) -> StoreResult<()>;

    /// Persist courses, replacing any with the same id. Returns the number saved.
    async fn save_all(&self, courses: Vec<Course>) -> StoreResult<usize>;
}
