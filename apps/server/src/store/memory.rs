//! In-process document store
//!
//! Evaluates [`CourseQuery`] values directly against a list of courses. Used
//! for local development and tests.
//! - contains: case-insensitive substring of the text as given
//! - equals: exact match
//! - range / on-or-after: inclusive; records missing the field never match
//! - sort: stable, records missing the sort key last

use async_trait::async_trait;
use course_query::{Clause, Course, CourseQuery, Field, Scalar, SortDirection, SortSpec};
use std::cmp::Ordering;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentStore, StoreHits, StoreResult};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    courses: RwLock<Vec<Course>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_courses(courses: Vec<Course>) -> Self {
        Self {
            courses: RwLock::new(courses),
        }
    }

    pub async fn len(&self) -> usize {
        self.courses.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.courses.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn execute(&self, query: &CourseQuery) -> StoreResult<StoreHits> {
        let courses = self.courses.read().await;

        let mut matched: Vec<&Course> = courses
            .iter()
            .filter(|c| query.criteria.clauses().iter().all(|cl| matches(c, cl)))
            .collect();

        if let Some(sort) = query.sort {
            matched.sort_by(|a, b| compare(a, b, sort));
        }

        let total_hits = matched.len() as u64;
        let selected = match (query.page, query.limit) {
            (Some(page), _) => matched
                .into_iter()
                .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
                .take(page.size as usize)
                .cloned()
                .collect(),
            (None, Some(limit)) => matched.into_iter().take(limit).cloned().collect(),
            (None, None) => matched.into_iter().cloned().collect(),
        };

        Ok(StoreHits {
            total_hits,
            hits: selected,
        })
    }

    async fn recreate_index(&self) -> StoreResult<()> {
        self.courses.write().await.clear();
        Ok(())
    }

    async fn save_all(&self, courses: Vec<Course>) -> StoreResult<usize> {
        let mut stored = self.courses.write().await;
        let count = courses.len();
        for mut course in courses {
            if course.id.is_empty() {
                course.id = Uuid::new_v4().to_string();
            }
            match stored.iter_mut().find(|c| c.id == course.id) {
                Some(existing) => *existing = course,
                None => stored.push(course),
            }
        }
        Ok(count)
    }
}

fn text_value(course: &Course, field: Field) -> Option<&str> {
    match field {
        Field::Title => Some(course.title.as_str()),
        Field::Description => course.description.as_deref(),
        Field::Category => course.category.as_deref(),
        Field::Type => course.course_type.as_deref(),
        Field::TitleSuggest => course.title_suggest.as_deref(),
        Field::MinAge | Field::MaxAge | Field::Price | Field::NextSessionDate => None,
    }
}

fn scalar_value(course: &Course, field: Field) -> Option<Scalar> {
    match field {
        Field::MinAge => course.min_age.map(Scalar::from),
        Field::MaxAge => course.max_age.map(Scalar::from),
        Field::Price => course.price.map(Scalar::from),
        Field::NextSessionDate => course.next_session_date.map(Scalar::from),
        Field::Title | Field::Description | Field::Category | Field::Type | Field::TitleSuggest => {
            None
        }
    }
}

fn matches(course: &Course, clause: &Clause) -> bool {
    match clause {
        Clause::AnyContains { fields, text } => {
            let needle = text.to_lowercase();
            fields.iter().any(|f| {
                text_value(course, *f).is_some_and(|v| v.to_lowercase().contains(&needle))
            })
        }
        Clause::Equals { field, value } => text_value(course, *field) == Some(value.as_str()),
        Clause::Range { field, gte, lte } => match scalar_value(course, *field) {
            None => false,
            Some(v) => {
                gte.as_ref().map_or(true, |lo| &v >= lo) && lte.as_ref().map_or(true, |hi| &v <= hi)
            }
        },
        Clause::OnOrAfter { field, instant } => {
            scalar_value(course, *field).is_some_and(|v| v >= Scalar::Instant(*instant))
        }
    }
}

fn compare(a: &Course, b: &Course, sort: SortSpec) -> Ordering {
    let key = |c: &Course| {
        scalar_value(c, sort.field).map(Key::Scalar).or_else(|| {
            text_value(c, sort.field).map(|s| Key::Text(s.to_string()))
        })
    };
    match (key(a), key(b)) {
        (Some(x), Some(y)) => match sort.direction {
            SortDirection::Ascending => x.cmp(&y),
            SortDirection::Descending => y.cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum Key {
    Scalar(Scalar),
    Text(String),
}
