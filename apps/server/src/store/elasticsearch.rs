//! Elasticsearch document store on the official client
//!
//! Translates [`CourseQuery`] into the `_search` JSON DSL:
//! - contains → `query_string` with `*text*` over the listed fields
//! - equals → `term`
//! - range / on-or-after → `range`
//! - sort and `from`/`size`, with exact total hit tracking

use async_trait::async_trait;
use course_query::{Clause, Course, CourseQuery, Scalar};
use elasticsearch::{
    auth::Credentials,
    http::{
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
        StatusCode, Url,
    },
    indices::{IndicesCreateParts, IndicesDeleteParts},
    params::Refresh,
    BulkOperation, BulkParts, Elasticsearch, SearchParts,
};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::time::Duration;

use super::escape::contains_pattern;
use super::{DocumentStore, StoreError, StoreHits, StoreResult};
use crate::config::StoreConfig;

/// Largest window Elasticsearch serves without scrolling (`index.max_result_window`).
const MAX_RESULT_WINDOW: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct ElasticsearchStore {
    client: Elasticsearch,
    index: String,
}

impl ElasticsearchStore {
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let raw = config
            .url
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("no elasticsearch url configured".to_string()))?;
        let url = Url::parse(raw)
            .map_err(|e| StoreError::Unavailable(format!("invalid elasticsearch url {raw}: {e}")))?;

        let mut builder = TransportBuilder::new(SingleNodeConnectionPool::new(url))
            .timeout(Duration::from_secs(config.timeout_seconds));
        if let Some(user) = &config.username {
            builder = builder.auth(Credentials::Basic(
                user.clone(),
                config.password.clone().unwrap_or_default(),
            ));
        }
        let transport = builder
            .build()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(Self {
            client: Elasticsearch::new(transport),
            index: config.index.clone(),
        })
    }
}

#[async_trait]
impl DocumentStore for ElasticsearchStore {
    async fn execute(&self, query: &CourseQuery) -> StoreResult<StoreHits> {
        let body = search_body(query);
        tracing::debug!(index = %self.index, query = %body, "elasticsearch search");

        let response = self
            .client
            .search(SearchParts::Index(&[&self.index]))
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response).await?;

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(parsed.into_hits())
    }

    async fn recreate_index(&self) -> StoreResult<()> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[&self.index]))
            .send()
            .await
            .map_err(transport_error)?;
        if response.status_code() != StatusCode::NOT_FOUND {
            ensure_success(response).await?;
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&self.index))
            .body(index_mapping())
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await?;
        tracing::info!(index = %self.index, "Elasticsearch index recreated");
        Ok(())
    }

    async fn save_all(&self, courses: Vec<Course>) -> StoreResult<usize> {
        if courses.is_empty() {
            return Ok(0);
        }
        let count = courses.len();

        let response = self
            .client
            .bulk(BulkParts::Index(&self.index))
            .body(bulk_operations(courses))
            .refresh(Refresh::True)
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response).await?;

        let summary: BulkResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        summary.check()?;
        Ok(count)
    }
}

fn transport_error(err: elasticsearch::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Unavailable(err.to_string())
    } else {
        StoreError::Transport(err)
    }
}

async fn ensure_success(response: Response) -> StoreResult<Response> {
    let status = response.status_code();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        status: status.as_u16(),
        body,
    })
}

/// Build the `_search` request body for a query.
pub(crate) fn search_body(query: &CourseQuery) -> JsonValue {
    let must: Vec<JsonValue> = query.criteria.clauses().iter().map(clause_json).collect();
    let filter = if must.is_empty() {
        json!({ "match_all": {} })
    } else {
        json!({ "bool": { "must": must } })
    };

    let mut body = json!({
        "query": filter,
        "track_total_hits": true,
    });

    if let Some(sort) = query.sort {
        body["sort"] = json!([{ sort.field.as_str(): { "order": sort.direction.as_str() } }]);
    }

    let (from, size) = match (query.page, query.limit) {
        (Some(page), _) => (page.offset(), u64::from(page.size)),
        (None, Some(limit)) => (0, (limit as u64).min(MAX_RESULT_WINDOW)),
        (None, None) => (0, MAX_RESULT_WINDOW),
    };
    body["from"] = json!(from);
    body["size"] = json!(size);
    body
}

fn clause_json(clause: &Clause) -> JsonValue {
    match clause {
        Clause::AnyContains { fields, text } => json!({
            "query_string": {
                "query": contains_pattern(text),
                "fields": fields.iter().map(|f| f.as_str()).collect::<Vec<_>>(),
                "analyze_wildcard": true,
                "default_operator": "and",
            }
        }),
        Clause::Equals { field, value } => json!({ "term": { field.as_str(): value } }),
        Clause::Range { field, gte, lte } => {
            let mut bounds = serde_json::Map::new();
            if let Some(v) = gte {
                bounds.insert("gte".to_string(), scalar_json(v));
            }
            if let Some(v) = lte {
                bounds.insert("lte".to_string(), scalar_json(v));
            }
            json!({ "range": { field.as_str(): bounds } })
        }
        Clause::OnOrAfter { field, instant } => json!({
            "range": { field.as_str(): { "gte": instant.to_rfc3339() } }
        }),
    }
}

fn scalar_json(value: &Scalar) -> JsonValue {
    match value {
        Scalar::Integer(v) => json!(v),
        Scalar::Decimal(v) => json!(v),
        Scalar::Instant(v) => json!(v.to_rfc3339()),
    }
}

fn index_mapping() -> JsonValue {
    json!({
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "title": { "type": "text" },
                "description": { "type": "text" },
                "category": { "type": "keyword" },
                "type": { "type": "keyword" },
                "gradeRange": { "type": "keyword" },
                "minAge": { "type": "integer" },
                "maxAge": { "type": "integer" },
                "price": { "type": "double" },
                "nextSessionDate": { "type": "date" },
                "titleSuggest": { "type": "completion" }
            }
        }
    })
}

/// One `index` action per course; courses without an id get a generated one.
fn bulk_operations(courses: Vec<Course>) -> Vec<BulkOperation<Course>> {
    courses
        .into_iter()
        .map(|course| {
            let id = course.id.clone();
            let operation = BulkOperation::index(course);
            if id.is_empty() {
                operation.into()
            } else {
                operation.id(id).into()
            }
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    total: Option<TotalHits>,
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct TotalHits {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source")]
    source: Course,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    errors: bool,
    #[serde(default)]
    items: Vec<JsonValue>,
}

impl BulkResponse {
    fn check(&self) -> StoreResult<()> {
        if !self.errors {
            return Ok(());
        }
        let failed = self
            .items
            .iter()
            .filter(|item| item["index"].get("error").is_some())
            .count();
        Err(StoreError::Rejected {
            status: 200,
            body: format!("bulk request reported {failed} failed item(s)"),
        })
    }
}

impl SearchResponse {
    fn into_hits(self) -> StoreHits {
        let hits: Vec<Course> = self
            .hits
            .hits
            .into_iter()
            .map(|hit| {
                let mut course = hit.source;
                if course.id.is_empty() {
                    course.id = hit.id;
                }
                course
            })
            .collect();
        let total_hits = self
            .hits
            .total
            .map_or(hits.len() as u64, |total| total.value);
        StoreHits { total_hits, hits }
    }
}
