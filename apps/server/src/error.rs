//! Error types for the course search server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use course_query::QueryError;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Document store failure: {0}")]
    StoreFailure(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::InvalidParameter(reason) => Error::InvalidParameter(reason),
        }
    }
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Error::StoreFailure(_) | Error::Config(_) | Error::Internal(_) | Error::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Error::InvalidParameter(reason) => reason.clone(),
            Error::StoreFailure(_) => {
                tracing::error!(error = %self, "Search backend error");
                "Search backend unavailable".to_string()
            }
            Error::Config(_) | Error::Internal(_) | Error::Other(_) => {
                tracing::error!(error = %self, "Internal error");
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message,
        }));

        (status, body).into_response()
    }
}
