//! Course search routes under `/api/search`

use crate::api::handlers::search;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/api/search", get(search::search_courses))
        .route("/api/search/suggest", get(search::suggest_titles))
}
