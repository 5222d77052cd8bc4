//! Course search handlers
//!
//! - `GET /api/search` filtered, sorted, paginated search
//! - `GET /api/search/suggest` title suggestions

use axum::{
    extract::{RawQuery, State},
    Json,
};
use course_query::{SearchResult, SuggestResult};

use crate::{
    api::search_request::{parse_query_items, suggest_text, SearchRequest},
    state::AppState,
    Result,
};

pub async fn search_courses(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<SearchResult>> {
    let items = parse_query_items(raw_query.as_deref());
    let request = SearchRequest::from_items(&items, &state.config.search)?;

    let result = state.search.search(&request.into_params()).await?;
    Ok(Json(result))
}

pub async fn suggest_titles(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<SuggestResult>> {
    let items = parse_query_items(raw_query.as_deref());
    let text = suggest_text(&items)?;

    let result = state.search.suggest(Some(text)).await?;
    Ok(Json(result))
}
