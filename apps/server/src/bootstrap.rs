//! Startup indexing of sample courses
//!
//! Reads a JSON array of courses (a configured file, or the sample bundled
//! into the binary), derives the suggestion field and writes them through
//! the document store.

use anyhow::Context;
use course_query::Course;
use std::path::Path;

use crate::{config::BootstrapConfig, store::DocumentStore};

const BUNDLED_SAMPLE: &str = include_str!("../data/sample-courses.json");

/// Index the configured sample data. Returns the number of courses saved.
pub async fn run(config: &BootstrapConfig, store: &dyn DocumentStore) -> anyhow::Result<usize> {
    if !config.enabled {
        tracing::info!("Bootstrap disabled, skipping sample data");
        return Ok(0);
    }

    let courses = match config.sample_data_path.as_deref() {
        Some(path) => load_courses(path)?,
        None => bundled_courses()?,
    };
    index_courses(store, courses, config.recreate_index).await
}

/// The sample courses compiled into the binary.
pub fn bundled_courses() -> anyhow::Result<Vec<Course>> {
    serde_json::from_str(BUNDLED_SAMPLE).context("Failed to parse bundled sample data")
}

/// Read a JSON array of courses from `path`.
pub fn load_courses(path: &Path) -> anyhow::Result<Vec<Course>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sample data from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse sample data in {}", path.display()))
}

/// Prepare `courses` for indexing and save them, optionally recreating the index first.
pub async fn index_courses(
    store: &dyn DocumentStore,
    courses: Vec<Course>,
    recreate_index: bool,
) -> anyhow::Result<usize> {
    if recreate_index {
        store
            .recreate_index()
            .await
            .context("Failed to recreate course index")?;
        tracing::info!("Course index recreated");
    }

    let courses: Vec<Course> = courses.into_iter().map(Course::prepare_for_index).collect();
    let saved = store
        .save_all(courses)
        .await
        .context("Failed to index sample courses")?;

    tracing::info!(count = saved, "Indexed sample courses");
    Ok(saved)
}
