//! Raw search parameters and their validation into a [`SearchFilter`].
//!
//! Validation runs to completion before any criteria are built; the first
//! violated rule aborts with [`QueryError::InvalidParameter`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::{QueryError, Result};

/// Zero-based page index used when the caller gives none.
pub const DEFAULT_PAGE: u32 = 0;
/// Page size used when the caller gives none.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Loosely-typed search input, every filter optional.
///
/// Ages and prices are signed so that negative input reaches validation and is
/// rejected there with a descriptive reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub min_age: Option<i64>,
    pub max_age: Option<i64>,
    pub category: Option<String>,
    pub course_type: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub start_date: Option<DateTime<Utc>>,
    pub sort: Option<String>,
    pub page: u32,
    pub size: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            keyword: None,
            min_age: None,
            max_age: None,
            category: None,
            course_type: None,
            min_price: None,
            max_price: None,
            start_date: None,
            sort: None,
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Result ordering requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    PriceAscending,
    PriceDescending,
    #[default]
    NextSessionAscending,
}

impl SortMode {
    pub const TOKENS: [&'static str; 3] = ["priceAsc", "priceDesc", "nextSessionDate"];

    /// Exact, case-sensitive token match.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "priceAsc" => Some(Self::PriceAscending),
            "priceDesc" => Some(Self::PriceDescending),
            "nextSessionDate" => Some(Self::NextSessionAscending),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PriceAscending => "priceAsc",
            Self::PriceDescending => "priceDesc",
            Self::NextSessionAscending => "nextSessionDate",
        }
    }
}

/// Search input that passed validation. Only [`SearchParams::validate`] builds one.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilter {
    pub(crate) keyword: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) course_type: Option<String>,
    pub(crate) min_age: Option<u32>,
    pub(crate) max_age: Option<u32>,
    pub(crate) min_price: Option<Decimal>,
    pub(crate) max_price: Option<Decimal>,
    pub(crate) start_date: Option<DateTime<Utc>>,
    pub(crate) sort: SortMode,
    pub(crate) page: u32,
    pub(crate) size: u32,
}

impl SearchFilter {
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every documented constraint, in order, and produce the filter.
    pub fn validate(&self) -> Result<SearchFilter> {
        if let (Some(min), Some(max)) = (self.min_age, self.max_age) {
            if min > max {
                return Err(QueryError::invalid("minAge cannot be greater than maxAge"));
            }
        }
        let min_age = non_negative_age(self.min_age, "minAge")?;
        let max_age = non_negative_age(self.max_age, "maxAge")?;

        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(QueryError::invalid(
                    "minPrice cannot be greater than maxPrice",
                ));
            }
        }
        let min_price = non_negative_price(self.min_price, "minPrice")?;
        let max_price = non_negative_price(self.max_price, "maxPrice")?;

        let sort = match self.sort.as_deref() {
            None => SortMode::default(),
            Some(token) => SortMode::parse(token).ok_or_else(|| {
                QueryError::invalid(format!(
                    "Invalid sort parameter. Must be one of: {}",
                    SortMode::TOKENS.join(", ")
                ))
            })?,
        };

        Ok(SearchFilter {
            keyword: self.keyword.clone(),
            category: self.category.clone(),
            course_type: self.course_type.clone(),
            min_age,
            max_age,
            min_price,
            max_price,
            start_date: self.start_date,
            sort,
            page: self.page,
            size: self.size,
        })
    }
}

fn non_negative_age(value: Option<i64>, name: &str) -> Result<Option<u32>> {
    match value {
        None => Ok(None),
        Some(v) if v < 0 => Err(QueryError::invalid(format!("{name} cannot be negative"))),
        Some(v) => u32::try_from(v)
            .map(Some)
            .map_err(|_| QueryError::invalid(format!("{name} is out of range"))),
    }
}

fn non_negative_price(value: Option<Decimal>, name: &str) -> Result<Option<Decimal>> {
    match value {
        Some(v) if v.is_sign_negative() && !v.is_zero() => {
            Err(QueryError::invalid(format!("{name} cannot be negative")))
        }
        other => Ok(other),
    }
}
