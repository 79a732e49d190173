//! Catalog API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use cabinet_core::{FacetListing, GameEntry, GameQuery};

use super::handlers::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GamesQueryParams {
    #[serde(default)]
    pub search: Option<String>,
    /// Comma-separated `prefix:value` tokens, e.g. `g:fighting,t:co-op`
    #[serde(default)]
    pub filters: Option<String>,
}

/// GET /api/v1/filters
///
/// Every facet with its options and counts, for building the filter UI.
pub async fn list_filters(State(state): State<Arc<AppState>>) -> Json<Vec<FacetListing>> {
    Json(state.catalog().facets())
}

/// GET /api/v1/games
///
/// Games matching the title search and every facet filter, sorted by title.
pub async fn list_games(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GamesQueryParams>,
) -> Json<Vec<GameEntry>> {
    let query = GameQuery::from_params(params.search.as_deref(), params.filters.as_deref());
    let games = state
        .catalog()
        .query(&query)
        .into_iter()
        .cloned()
        .collect();
    Json(games)
}

/// GET /api/v1/games/{id}
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GameEntry>, impl IntoResponse> {
    match state.catalog().get(&id) {
        Some(entry) => Ok(Json(entry.clone())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Game not found: {}", id),
            }),
        )),
    }
}
