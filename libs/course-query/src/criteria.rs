//! Filter criteria as an immutable list of clauses, implicitly ANDed.

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;

use crate::params::SearchFilter;

/// Indexed course fields that criteria and sorts can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    Category,
    Type,
    MinAge,
    MaxAge,
    Price,
    NextSessionDate,
    TitleSuggest,
}

impl Field {
    /// Field name in the stored document.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Category => "category",
            Self::Type => "type",
            Self::MinAge => "minAge",
            Self::MaxAge => "maxAge",
            Self::Price => "price",
            Self::NextSessionDate => "nextSessionDate",
            Self::TitleSuggest => "titleSuggest",
        }
    }
}

/// A comparable bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Scalar {
    Integer(i64),
    Decimal(Decimal),
    Instant(DateTime<Utc>),
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<Decimal> for Scalar {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

/// Instants compare in UTC whatever offset they carry.
impl From<DateTime<FixedOffset>> for Scalar {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Self::Instant(v.with_timezone(&Utc))
    }
}

/// One atomic filter condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// At least one of `fields` contains `text` (OR group).
    AnyContains { fields: Vec<Field>, text: String },
    /// `field` equals `value` exactly.
    Equals { field: Field, value: String },
    /// `field` lies within the inclusive bounds; at least one bound is set.
    Range {
        field: Field,
        gte: Option<Scalar>,
        lte: Option<Scalar>,
    },
    /// `field` is at or after `instant`.
    OnOrAfter { field: Field, instant: DateTime<Utc> },
}

impl Clause {
    pub fn contains_any(fields: &[Field], text: impl Into<String>) -> Self {
        Self::AnyContains {
            fields: fields.to_vec(),
            text: text.into(),
        }
    }

    /// Equality clause, or nothing when the value is absent or blank.
    pub fn equals_opt(field: Field, value: Option<&str>) -> Option<Self> {
        let value = non_blank(value)?;
        Some(Self::Equals {
            field,
            value: value.to_string(),
        })
    }

    /// Range clause, or nothing when both bounds are absent.
    pub fn range_opt<T: Into<Scalar>>(field: Field, gte: Option<T>, lte: Option<T>) -> Option<Self> {
        if gte.is_none() && lte.is_none() {
            return None;
        }
        Some(Self::Range {
            field,
            gte: gte.map(Into::into),
            lte: lte.map(Into::into),
        })
    }

    pub fn on_or_after_opt(field: Field, instant: Option<DateTime<Utc>>) -> Option<Self> {
        instant.map(|instant| Self::OnOrAfter { field, instant })
    }
}

/// Conjunction of clauses, in composition order. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    clauses: Vec<Clause>,
}

impl Criteria {
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Compose the clauses for a validated filter.
    ///
    /// Order: keyword, category, type, age, price, start date. Both age bounds
    /// narrow the course's `minAge` field.
    pub fn from_filter(filter: &SearchFilter) -> Self {
        let keyword = non_blank(filter.keyword.as_deref())
            .map(|k| Clause::contains_any(&[Field::Title, Field::Description], k));

        let clauses = [
            keyword,
            Clause::equals_opt(Field::Category, filter.category.as_deref()),
            Clause::equals_opt(Field::Type, filter.course_type.as_deref()),
            Clause::range_opt(Field::MinAge, filter.min_age, filter.max_age),
            Clause::range_opt(Field::Price, filter.min_price, filter.max_price),
            Clause::on_or_after_opt(Field::NextSessionDate, filter.start_date),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self { clauses }
    }
}

impl FromIterator<Clause> for Criteria {
    fn from_iter<I: IntoIterator<Item = Clause>>(iter: I) -> Self {
        Self {
            clauses: iter.into_iter().collect(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
