use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A caller-supplied filter, sort or paging value violates a documented constraint.
    #[error("{0}")]
    InvalidParameter(String),
}

impl QueryError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameter(reason.into())
    }
}
