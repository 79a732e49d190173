//! Launch history API handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use cabinet_core::LaunchRecord;

use super::handlers::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

#[derive(Debug, Serialize)]
pub struct LaunchListResponse {
    pub launches: Vec<LaunchRecord>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct LaunchCountView {
    pub entry_id: String,
    /// Display title, absent if the game left the catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct LaunchCountsResponse {
    pub counts: Vec<LaunchCountView>,
}

fn internal_error(e: impl std::fmt::Display) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

/// GET /api/v1/launches
///
/// Most recent launches, newest first.
pub async fn list_launches(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitParams>,
) -> Result<Json<LaunchListResponse>, impl IntoResponse> {
    match state.launch_store().recent(params.limit) {
        Ok(launches) => {
            let total = launches.len();
            Ok(Json(LaunchListResponse { launches, total }))
        }
        Err(e) => Err(internal_error(e)),
    }
}

/// GET /api/v1/launches/counts
///
/// Most played games.
pub async fn list_counts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitParams>,
) -> Result<Json<LaunchCountsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let counts = state
        .launch_store()
        .top_counts(params.limit)
        .map_err(internal_error)?;

    let counts = counts
        .into_iter()
        .map(|c| LaunchCountView {
            title: state
                .catalog()
                .get(&c.entry_id)
                .map(|e| e.title().to_string()),
            entry_id: c.entry_id,
            count: c.count,
        })
        .collect();

    Ok(Json(LaunchCountsResponse { counts }))
}
