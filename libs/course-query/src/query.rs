//! Store-agnostic query values handed to the document store.

use crate::criteria::{Clause, Criteria, Field};
use crate::error::Result;
use crate::params::{SearchFilter, SearchParams, SortMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: Field,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }
}

impl From<SortMode> for SortSpec {
    fn from(mode: SortMode) -> Self {
        match mode {
            SortMode::PriceAscending => Self::ascending(Field::Price),
            SortMode::PriceDescending => Self::descending(Field::Price),
            SortMode::NextSessionAscending => Self::ascending(Field::NextSessionDate),
        }
    }
}

/// Zero-based page index and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Number of hits skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// A complete query: criteria, ordering and the slice of hits wanted.
///
/// Ties between equal sort keys are ordered by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseQuery {
    pub criteria: Criteria,
    pub sort: Option<SortSpec>,
    pub page: Option<PageRequest>,
    /// Upper bound on returned hits when no page is requested.
    pub limit: Option<usize>,
}

impl CourseQuery {
    /// Query for a validated filter. Page and size pass through unchanged.
    pub fn search(filter: &SearchFilter) -> Self {
        let query = Self {
            criteria: Criteria::from_filter(filter),
            sort: Some(SortSpec::from(filter.sort())),
            page: Some(PageRequest::new(filter.page(), filter.size())),
            limit: None,
        };
        tracing::trace!(
            clauses = query.criteria.clauses().len(),
            sort = filter.sort().as_str(),
            page = filter.page(),
            size = filter.size(),
            "built search query"
        );
        query
    }

    /// Title-contains query for suggestions; unsorted and unpaged.
    pub fn suggestion(text: &str, limit: Option<usize>) -> Self {
        Self {
            criteria: std::iter::once(Clause::contains_any(&[Field::Title], text)).collect(),
            sort: None,
            page: None,
            limit,
        }
    }
}

/// Validate `params` and build the search query in one step.
pub fn build_search_query(params: &SearchParams) -> Result<CourseQuery> {
    let filter = params.validate()?;
    Ok(CourseQuery::search(&filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;

    #[test]
    fn sort_resolution() {
        assert_eq!(
            SortSpec::from(SortMode::PriceAscending),
            SortSpec::ascending(Field::Price)
        );
        assert_eq!(
            SortSpec::from(SortMode::PriceDescending),
            SortSpec::descending(Field::Price)
        );
        assert_eq!(
            SortSpec::from(SortMode::NextSessionAscending),
            SortSpec::ascending(Field::NextSessionDate)
        );
    }

    #[test]
    fn default_search_sorts_by_next_session() {
        let query = build_search_query(&SearchParams::default()).unwrap();
        assert_eq!(query.sort, Some(SortSpec::ascending(Field::NextSessionDate)));
        assert_eq!(query.page, Some(PageRequest::new(0, 10)));
        assert!(query.criteria.is_empty());
        assert_eq!(query.limit, None);
    }

    #[test]
    fn page_and_size_pass_through() {
        let params = SearchParams {
            page: 2,
            size: 5,
            ..SearchParams::default()
        };
        let query = build_search_query(&params).unwrap();
        assert_eq!(query.page, Some(PageRequest::new(2, 5)));
        assert_eq!(query.page.unwrap().offset(), 10);
    }

    #[test]
    fn invalid_params_build_no_query() {
        let params = SearchParams {
            sort: Some("relevance".to_string()),
            ..SearchParams::default()
        };
        assert!(matches!(
            build_search_query(&params),
            Err(QueryError::InvalidParameter(_))
        ));
    }

    #[test]
    fn suggestion_query_is_single_title_clause() {
        let query = CourseQuery::suggestion("mat", Some(5));
        assert_eq!(
            query.criteria.clauses(),
            &[Clause::AnyContains {
                fields: vec![Field::Title],
                text: "mat".to_string(),
            }]
        );
        assert_eq!(query.sort, None);
        assert_eq!(query.page, None);
        assert_eq!(query.limit, Some(5));
    }
}
