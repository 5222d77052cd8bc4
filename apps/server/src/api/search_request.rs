//! Query-string parsing for the search endpoints
//!
//! Raw `(name, value)` items are turned into typed values here. A value that
//! cannot be parsed as its declared type is a client error, as are paging
//! values outside the configured bounds. Filter rules (range inversion,
//! negative bounds, sort tokens) are left to `course_query`.

use chrono::{DateTime, Utc};
use course_query::SearchParams;
use rust_decimal::Decimal;
use std::str::FromStr;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{config::SearchConfig, Error, Result};

/// Decode an `application/x-www-form-urlencoded` query string into ordered items.
pub fn parse_query_items(raw_query: Option<&str>) -> Vec<(String, String)> {
    raw_query
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// Last value for `name`, matching how repeated parameters are resolved.
fn last_value<'a>(items: &'a [(String, String)], name: &str) -> Option<&'a str> {
    items
        .iter()
        .rev()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// `GET /api/search` parameters after type parsing
#[derive(Debug, Clone, PartialEq, Validate)]
#[validate(schema(function = "check_paging"))]
pub struct SearchRequest {
    pub q: Option<String>,
    pub min_age: Option<i64>,
    pub max_age: Option<i64>,
    pub category: Option<String>,
    pub course_type: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub start_date: Option<DateTime<Utc>>,
    pub sort: Option<String>,
    pub page: i64,
    pub size: i64,
    /// Upper bound for `size`, from [`SearchConfig::max_page_size`].
    max_size: u32,
}

impl SearchRequest {
    /// Parse and bound-check the search parameters in `items`.
    ///
    /// Unknown parameters are ignored. Empty numeric or date values count as absent.
    pub fn from_items(items: &[(String, String)], limits: &SearchConfig) -> Result<Self> {
        let request = Self {
            q: text(items, "q"),
            min_age: typed(items, "minAge", "an integer", |v| v.parse::<i64>().ok())?,
            max_age: typed(items, "maxAge", "an integer", |v| v.parse::<i64>().ok())?,
            category: text(items, "category"),
            course_type: text(items, "type"),
            min_price: typed(items, "minPrice", "a decimal number", parse_decimal)?,
            max_price: typed(items, "maxPrice", "a decimal number", parse_decimal)?,
            start_date: typed(items, "startDate", "an ISO-8601 date-time", parse_instant)?,
            sort: text(items, "sort"),
            page: typed(items, "page", "an integer", |v| v.parse::<i64>().ok())?
                .unwrap_or(i64::from(course_query::DEFAULT_PAGE)),
            size: typed(items, "size", "an integer", |v| v.parse::<i64>().ok())?
                .unwrap_or(i64::from(limits.default_page_size)),
            max_size: limits.max_page_size,
        };

        request.validate().map_err(first_violation)?;
        Ok(request)
    }

    /// Convert into core parameters. Paging bounds were checked in `from_items`.
    pub fn into_params(self) -> SearchParams {
        SearchParams {
            keyword: self.q,
            min_age: self.min_age,
            max_age: self.max_age,
            category: self.category,
            course_type: self.course_type,
            min_price: self.min_price,
            max_price: self.max_price,
            start_date: self.start_date,
            sort: self.sort,
            page: u32::try_from(self.page).unwrap_or(u32::MAX),
            size: u32::try_from(self.size).unwrap_or(u32::MAX),
        }
    }
}

/// `q` for `GET /api/search/suggest`; required but may be empty.
pub fn suggest_text(items: &[(String, String)]) -> Result<&str> {
    last_value(items, "q")
        .ok_or_else(|| Error::InvalidParameter("Required parameter 'q' is missing".to_string()))
}

fn text(items: &[(String, String)], name: &str) -> Option<String> {
    last_value(items, name).map(str::to_string)
}

fn typed<T>(
    items: &[(String, String)],
    name: &str,
    expected: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>> {
    match last_value(items, name).map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse(raw).map(Some).ok_or_else(|| {
            Error::InvalidParameter(format!("Invalid value for {name}: '{raw}' is not {expected}"))
        }),
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Paging bounds: `0 <= page <= u32::MAX` and `1 <= size <= max_size`.
fn check_paging(request: &SearchRequest) -> std::result::Result<(), ValidationError> {
    if request.page < 0 {
        return Err(violation("page_min", "page must be greater than or equal to 0".to_string()));
    }
    if request.page > i64::from(u32::MAX) {
        return Err(violation(
            "page_max",
            format!("page must be less than or equal to {}", u32::MAX),
        ));
    }
    if request.size < 1 {
        return Err(violation("size_min", "size must be greater than or equal to 1".to_string()));
    }
    if request.size > i64::from(request.max_size) {
        return Err(violation(
            "size_max",
            format!("size must be less than or equal to {}", request.max_size),
        ));
    }
    Ok(())
}

fn violation(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn first_violation(errors: ValidationErrors) -> Error {
    let message = errors
        .field_errors()
        .into_values()
        .flatten()
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string());
    Error::InvalidParameter(message)
}
