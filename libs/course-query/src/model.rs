//! Course records and the result payloads built from store hits.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

/// A course record as stored in the document index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub course_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Keeps the offset the document was written with.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_session_date"
    )]
    pub next_session_date: Option<DateTime<FixedOffset>>,
    /// Copy of `title` consumed by the suggestion path. Only the indexing path writes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_suggest: Option<String>,
}

/// RFC 3339 with `Z` for a zero offset, so UTC documents read back as written.
fn serialize_session_date<S: Serializer>(
    value: &Option<DateTime<FixedOffset>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(date) => serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        None => serializer.serialize_none(),
    }
}

impl Course {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Derive `title_suggest` from `title`, as done for every record at index time.
    pub fn prepare_for_index(mut self) -> Self {
        self.title_suggest = Some(self.title.clone());
        self
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Size of the full matching set, not of `courses`.
    pub total: u64,
    pub courses: Vec<Course>,
}

/// Title suggestions in store-returned order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestResult {
    pub suggestions: Vec<String>,
    pub total_hits: u64,
}
