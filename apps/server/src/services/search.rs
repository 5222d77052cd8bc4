//! Search service - course search and title suggestions
//!
//! Orchestrates both operations by:
//! - Validating parameters and building the query (`course_query`)
//! - Running exactly one query against the document store
//! - Mapping hits to response payloads in store order

use course_query::{build_search_query, CourseQuery, SearchParams, SearchResult, SuggestResult};
use std::sync::Arc;
use std::time::Instant;

use crate::{
    metrics::{outcome_label, SEARCH_RESULTS, SEARCH_TOTAL, STORE_QUERY_DURATION_SECONDS},
    store::{DocumentStore, StoreHits},
    Result,
};

/// Search service coordinates course search and suggestions
pub struct SearchService {
    store: Arc<dyn DocumentStore>,
    max_suggestions: Option<usize>,
}

impl SearchService {
    /// Create a new search service with unlimited suggestions
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            max_suggestions: None,
        }
    }

    /// Cap the number of suggestions returned per call
    pub fn with_max_suggestions(mut self, max_suggestions: Option<usize>) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }

    /// Filtered, sorted, paginated course search
    ///
    /// Invalid parameters are rejected before the store is contacted.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResult> {
        let result = self.run_search(params).await;
        SEARCH_TOTAL
            .with_label_values(&["search", outcome_label(&result)])
            .inc();
        result
    }

    async fn run_search(&self, params: &SearchParams) -> Result<SearchResult> {
        let query = build_search_query(params).inspect_err(|e| {
            tracing::debug!(reason = %e, "Rejected search parameters");
        })?;
        tracing::debug!(?query, "Executing course search");

        let hits = self.execute("search", &query).await?;
        let result = SearchResult {
            total: hits.total_hits,
            courses: hits.hits,
        };

        SEARCH_RESULTS
            .with_label_values(&["search"])
            .observe(result.courses.len() as f64);
        tracing::info!(
            total = result.total,
            returned = result.courses.len(),
            "Course search completed"
        );
        Ok(result)
    }

    /// Title suggestions for partial text
    ///
    /// Blank input returns an empty result without contacting the store.
    /// Repeated titles are returned as the store reports them.
    pub async fn suggest(&self, text: Option<&str>) -> Result<SuggestResult> {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            SEARCH_TOTAL.with_label_values(&["suggest", "success"]).inc();
            SEARCH_RESULTS.with_label_values(&["suggest"]).observe(0.0);
            return Ok(SuggestResult::default());
        };

        let query = CourseQuery::suggestion(text, self.max_suggestions);
        let result = self.execute("suggest", &query).await.map(|hits| SuggestResult {
            suggestions: hits.hits.into_iter().map(|c| c.title).collect(),
            total_hits: hits.total_hits,
        });

        SEARCH_TOTAL
            .with_label_values(&["suggest", outcome_label(&result)])
            .inc();
        let result = result?;
        SEARCH_RESULTS
            .with_label_values(&["suggest"])
            .observe(result.suggestions.len() as f64);
        Ok(result)
    }

    async fn execute(&self, operation: &str, query: &CourseQuery) -> Result<StoreHits> {
        let start = Instant::now();
        let hits = self.store.execute(query).await;
        STORE_QUERY_DURATION_SECONDS
            .with_label_values(&[operation])
            .observe(start.elapsed().as_secs_f64());

        hits.map_err(|e| {
            tracing::warn!(operation, error = %e, "Document store query failed");
            e.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{StoreError, StoreResult};
    use crate::Error;
    use async_trait::async_trait;
    use course_query::{Course, Field, PageRequest, SortSpec};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Mutex;

    /// Store double that records queries and replays canned hits.
    #[derive(Default)]
    struct RecordingStore {
        queries: Mutex<Vec<CourseQuery>>,
        response: StoreHits,
        fail: bool,
    }

    impl RecordingStore {
        fn returning(total_hits: u64, hits: Vec<Course>) -> Self {
            Self {
                response: StoreHits { total_hits, hits },
                ..Self::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.queries.lock().unwrap().len()
        }

        fn last_query(&self) -> CourseQuery {
            self.queries.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl DocumentStore for RecordingStore {
        async fn execute(&self, query: &CourseQuery) -> StoreResult<StoreHits> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail {
                return Err(StoreError::Unavailable("connection refused".to_string()));
            }
            Ok(self.response.clone())
        }

        async fn recreate_index(&self) -> StoreResult<()> {
            Ok(())
        }

        async fn save_all(&self, courses: Vec<Course>) -> StoreResult<usize> {
            Ok(courses.len())
        }
    }

    fn sample_course() -> Course {
        Course {
            id: "1".to_string(),
            title: "Math for Beginners".to_string(),
            description: Some("Intro to basic math concepts.".to_string()),
            category: Some("Math".to_string()),
            course_type: Some("COURSE".to_string()),
            min_age: Some(6),
            max_age: Some(8),
            price: Some(Decimal::from_str("199.99").unwrap()),
            next_session_date: Some("2025-06-10T15:00:00Z".parse().unwrap()),
            ..Course::default()
        }
    }

    fn service(store: &Arc<RecordingStore>) -> SearchService {
        SearchService::new(store.clone())
    }

    #[tokio::test]
    async fn search_with_all_filters_returns_store_page() {
        let store = Arc::new(RecordingStore::returning(1, vec![sample_course()]));
        let params = SearchParams {
            keyword: Some("math".to_string()),
            min_age: Some(6),
            max_age: Some(10),
            category: Some("Math".to_string()),
            course_type: Some("COURSE".to_string()),
            min_price: Some(Decimal::from_str("100.0").unwrap()),
            max_price: Some(Decimal::from_str("300.0").unwrap()),
            start_date: Some("2025-06-01T00:00:00Z".parse().unwrap()),
            sort: Some("priceAsc".to_string()),
            page: 0,
            size: 10,
        };

        let result = service(&store).search(&params).await.unwrap();

        assert_eq!(result.total, 1);
        assert_eq!(result.courses, vec![sample_course()]);
        assert_eq!(store.calls(), 1);
        let query = store.last_query();
        assert_eq!(query.criteria.clauses().len(), 6);
        assert_eq!(query.sort, Some(SortSpec::ascending(Field::Price)));
    }

    #[tokio::test]
    async fn total_reflects_full_matching_set() {
        let store = Arc::new(RecordingStore::returning(57, vec![sample_course()]));
        let result = service(&store).search(&SearchParams::default()).await.unwrap();
        assert_eq!(result.total, 57);
        assert_eq!(result.courses.len(), 1);
    }

    #[tokio::test]
    async fn empty_store_result_is_zero_and_empty() {
        let store = Arc::new(RecordingStore::returning(0, vec![]));
        let result = service(&store).search(&SearchParams::default()).await.unwrap();
        assert_eq!(result, SearchResult::default());
        assert_eq!(
            store.last_query().sort,
            Some(SortSpec::ascending(Field::NextSessionDate))
        );
    }

    #[tokio::test]
    async fn page_and_size_reach_the_store_unchanged() {
        let store = Arc::new(RecordingStore::returning(0, vec![]));
        let params = SearchParams {
            page: 2,
            size: 5,
            ..SearchParams::default()
        };
        service(&store).search(&params).await.unwrap();
        assert_eq!(store.last_query().page, Some(PageRequest::new(2, 5)));
    }

    #[tokio::test]
    async fn invalid_parameters_never_contact_the_store() {
        let store = Arc::new(RecordingStore::returning(1, vec![sample_course()]));
        let svc = service(&store);

        let cases = [
            SearchParams {
                min_age: Some(10),
                max_age: Some(5),
                ..SearchParams::default()
            },
            SearchParams {
                min_price: Some(Decimal::from(300)),
                max_price: Some(Decimal::from(100)),
                ..SearchParams::default()
            },
            SearchParams {
                sort: Some("invalidSort".to_string()),
                ..SearchParams::default()
            },
            SearchParams {
                max_age: Some(-1),
                ..SearchParams::default()
            },
        ];
        for params in cases {
            let err = svc.search(&params).await.unwrap_err();
            assert!(matches!(err, Error::InvalidParameter(_)), "got {err:?}");
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn identical_searches_return_identical_results() {
        let store = Arc::new(RecordingStore::returning(1, vec![sample_course()]));
        let svc = service(&store);
        let params = SearchParams {
            keyword: Some("math".to_string()),
            ..SearchParams::default()
        };

        let first = svc.search(&params).await.unwrap();
        let second = svc.search(&params).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let store = Arc::new(RecordingStore::failing());
        let err = service(&store)
            .search(&SearchParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::StoreFailure(_)));
    }

    #[tokio::test]
    async fn blank_suggest_queries_short_circuit() {
        let store = Arc::new(RecordingStore::returning(1, vec![sample_course()]));
        let svc = service(&store);

        for text in [None, Some(""), Some("   "), Some("\t\n")] {
            let result = svc.suggest(text).await.unwrap();
            assert_eq!(result, SuggestResult::default());
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn blank_suggest_is_counted() {
        let store = Arc::new(RecordingStore::default());
        let svc = service(&store);
        let counter = SEARCH_TOTAL.with_label_values(&["suggest", "success"]);

        let before = counter.get();
        svc.suggest(Some("  ")).await.unwrap();
        svc.suggest(None).await.unwrap();

        assert!(counter.get() >= before + 2);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn suggest_returns_titles_in_store_order() {
        let store = Arc::new(RecordingStore::returning(
            2,
            vec![sample_course(), Course::new("2", "Advanced Math")],
        ));
        let result = service(&store).suggest(Some("math")).await.unwrap();

        assert_eq!(
            result,
            SuggestResult {
                suggestions: vec!["Math for Beginners".to_string(), "Advanced Math".to_string()],
                total_hits: 2,
            }
        );
        let query = store.last_query();
        assert_eq!(query, CourseQuery::suggestion("math", None));
    }

    #[tokio::test]
    async fn suggest_keeps_repeated_titles() {
        // Known behavior, not a bug to silently fix: titles are not deduplicated.
        let store = Arc::new(RecordingStore::returning(
            2,
            vec![Course::new("1", "Chess Club"), Course::new("2", "Chess Club")],
        ));
        let result = service(&store).suggest(Some("chess")).await.unwrap();
        assert_eq!(result.suggestions, vec!["Chess Club", "Chess Club"]);
        assert_eq!(result.total_hits, 2);
    }

    #[tokio::test]
    async fn suggest_passes_raw_text_and_configured_cap() {
        let store = Arc::new(RecordingStore::returning(0, vec![]));
        let svc = SearchService::new(store.clone()).with_max_suggestions(Some(3));

        let result = svc.suggest(Some(" math@#$% ")).await.unwrap();
        assert_eq!(result, SuggestResult::default());
        assert_eq!(
            store.last_query(),
            CourseQuery::suggestion(" math@#$% ", Some(3))
        );
    }

    #[tokio::test]
    async fn suggest_store_failure_propagates() {
        let store = Arc::new(RecordingStore::failing());
        let err = service(&store).suggest(Some("math")).await.unwrap_err();
        assert!(matches!(err, Error::StoreFailure(_)));
    }
}
