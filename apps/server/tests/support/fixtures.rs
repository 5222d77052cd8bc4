use anyhow::Context as _;
use async_trait::async_trait;
use course_query::{Course, CourseQuery};
use course_search::{
    bootstrap,
    store::{DocumentStore, StoreError, StoreHits, StoreResult},
};

/// The sample courses bundled with the server.
pub fn sample_courses() -> anyhow::Result<Vec<Course>> {
    bootstrap::bundled_courses().context("load sample courses")
}

/// Store that fails every call, for exercising the 500 path.
pub struct UnavailableStore;

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn execute(&self, _query: &CourseQuery) -> StoreResult<StoreHits> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn recreate_index(&self) -> StoreResult<()> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn save_all(&self, _courses: Vec<Course>) -> StoreResult<usize> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}
