#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use course_query::Course;
use course_search::{
    api::create_router,
    bootstrap,
    store::{DocumentStore, InMemoryStore},
    AppState, Config,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt as _;

// Re-export commonly used items
pub use assertions::*;
pub use fixtures::*;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    /// App over an in-memory store seeded with the shipped sample courses.
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_courses(sample_courses()?).await
    }

    pub async fn with_courses(courses: Vec<Course>) -> anyhow::Result<Self> {
        Self::new_with_config(courses, |_| {}).await
    }

    pub async fn new_with_config(
        courses: Vec<Course>,
        configure: impl FnOnce(&mut Config),
    ) -> anyhow::Result<Self> {
        let store = Arc::new(InMemoryStore::new());
        bootstrap::index_courses(store.as_ref(), courses, true)
            .await
            .context("seed in-memory store")?;
        Self::with_store(store, configure)
    }

    /// App over an arbitrary store, e.g. one that fails every call.
    pub fn with_store(
        store: Arc<dyn DocumentStore>,
        configure: impl FnOnce(&mut Config),
    ) -> anyhow::Result<Self> {
        let mut config = Config::defaults().context("load default config")?;
        config.bootstrap.enabled = false;
        configure(&mut config);

        let state = AppState::with_store(config, store);
        let router = create_router(state.clone());
        Ok(Self { router, state })
    }

    pub async fn get(
        &self,
        path_and_query: &str,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.get_with_extra_headers(path_and_query, &[]).await
    }

    pub async fn get_with_extra_headers(
        &self,
        path_and_query: &str,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut request = Request::builder()
            .method(Method::GET)
            .uri(path_and_query)
            .header("host", "example.org")
            .header("accept", "application/json")
            .body(Body::empty())
            .context("build request")?;

        for (name, value) in extra_headers {
            request.headers_mut().insert(
                name.parse::<HeaderName>().context("parse header name")?,
                value.parse::<HeaderValue>().context("parse header value")?,
            );
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }

    pub async fn get_json(&self, path_and_query: &str) -> anyhow::Result<(StatusCode, Value)> {
        let (status, _, body) = self.get(path_and_query).await?;
        let json = serde_json::from_slice(&body)
            .with_context(|| format!("parse JSON body of {path_and_query}"))?;
        Ok((status, json))
    }
}
