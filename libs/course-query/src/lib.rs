//! Course search query construction.
//!
//! Turns optional, loosely-typed search parameters into a validated
//! [`SearchFilter`] and a store-agnostic [`CourseQuery`]:
//! - validation of age/price bounds and sort tokens
//! - criteria composition (keyword, category, type, age, price, start date)
//! - sort resolution and page pass-through
//! - the title-contains query behind suggestions

#![forbid(unsafe_code)]

mod criteria;
mod error;
mod model;
mod params;
mod query;

pub use criteria::{Clause, Criteria, Field, Scalar};
pub use error::{QueryError, Result};
pub use model::{Course, SearchResult, SuggestResult};
pub use params::{SearchFilter, SearchParams, SortMode, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use query::{build_search_query, CourseQuery, PageRequest, SortDirection, SortSpec};
