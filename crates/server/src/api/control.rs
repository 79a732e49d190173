//! Game server control: launch, stop, status and volume.
//!
//! These endpoints answer with a `{status: "OK" | "ERR", ...}` envelope
//! that the web frontend checks instead of the HTTP status alone.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use cabinet_core::{
    ClientLaunchResult, GameEntry, GatewayError, LaunchGateway, LaunchStoreError, MAX_VOLUME,
};

use super::middleware::AuthUser;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LaunchRequest {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VolumeRequest {
    #[serde(default)]
    pub volume: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ControlResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<GameEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub clients: Vec<ClientLaunchResult>,
}

impl ControlResponse {
    fn ok() -> Self {
        Self {
            status: "OK",
            title: None,
            message: None,
            detail: None,
            clients: Vec::new(),
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            status: "ERR",
            message: Some(message.into()),
            ..Self::ok()
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct ServerStateResponse {
    /// The running game, when the catalog knows it
    pub title: Option<GameEntry>,
    pub is_running: bool,
    pub volume: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct VolumeResponse {
    pub volume: Option<u8>,
}

type ControlError = (StatusCode, Json<ControlResponse>);

fn control_error(status: StatusCode, response: ControlResponse) -> ControlError {
    (status, Json(response))
}

fn gateway(state: &AppState) -> Result<Arc<dyn LaunchGateway>, ControlError> {
    state.gateway().cloned().ok_or_else(|| {
        control_error(
            StatusCode::SERVICE_UNAVAILABLE,
            ControlResponse::err("No game server configured"),
        )
    })
}

fn gateway_error(message: &str, e: GatewayError) -> ControlError {
    error!(error = %e, kind = e.kind(), "{}", message);
    let status = match &e {
        GatewayError::InvalidVolume(_) => StatusCode::BAD_REQUEST,
        GatewayError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    };
    control_error(status, ControlResponse::err(message).with_detail(e.to_string()))
}

fn store_error(e: LaunchStoreError) -> ControlError {
    error!(error = %e, "Launch history update failed");
    control_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        ControlResponse::err("Launch history unavailable").with_detail(e.to_string()),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/launch
///
/// Launch a catalog game on the game server, then point display clients
/// at it.
pub async fn launch(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<LaunchRequest>,
) -> Result<Json<ControlResponse>, ControlError> {
    let Some(id) = request.id.filter(|id| !id.is_empty()) else {
        warn!("Launch request without game id");
        return Err(control_error(
            StatusCode::BAD_REQUEST,
            ControlResponse::err("Game id missing"),
        ));
    };

    let Some(entry) = state.catalog().get(&id).cloned() else {
        warn!(id = %id, "Launch request for unknown game");
        return Err(control_error(
            StatusCode::NOT_FOUND,
            ControlResponse::err("Game not found"),
        ));
    };

    let gateway = gateway(&state)?;
    let store = state.launch_store();

    // The script replaces whatever is running
    if store.latest().map_err(store_error)?.is_some_and(|l| l.is_running()) {
        store.end_latest().map_err(store_error)?;
    }

    let outcome = gateway
        .launch(&entry)
        .await
        .map_err(|e| gateway_error("Failed to launch", e))?;

    if !outcome.is_success() {
        return Err(control_error(
            StatusCode::BAD_REQUEST,
            ControlResponse::err("Failed to launch").with_detail(outcome.stdout.trim_end()),
        ));
    }

    store
        .start_launch(&user_id, entry.id(), entry.app_id())
        .map_err(store_error)?;
    let count = store.increment_count(entry.id()).map_err(store_error)?;
    info!(id = %entry.id(), user = %user_id, count, "Game launched");

    let clients = gateway.launch_clients().await;

    Ok(Json(ControlResponse {
        title: Some(entry),
        clients,
        ..ControlResponse::ok()
    }))
}

/// POST /api/v1/stop
///
/// Stop the running game, if any.
pub async fn stop(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ControlResponse>, ControlError> {
    let gateway = gateway(&state)?;

    let status = gateway
        .status()
        .await
        .map_err(|e| gateway_error("Failed to query game server", e))?;

    if status.is_running() {
        gateway
            .stop()
            .await
            .map_err(|e| gateway_error("Failed to stop", e))?;
        state.launch_store().end_latest().map_err(store_error)?;
        info!(id = ?status.entry_id, "Game stopped");
    }

    Ok(Json(ControlResponse::ok()))
}

/// GET /api/v1/query
///
/// What the game server is running and its volume.
pub async fn query(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ServerStateResponse>, ControlError> {
    let gateway = gateway(&state)?;

    let status = gateway
        .status()
        .await
        .map_err(|e| gateway_error("Failed to query game server", e))?;

    let title = status
        .entry_id
        .as_deref()
        .and_then(|id| state.catalog().get(id))
        .cloned();

    Ok(Json(ServerStateResponse {
        title,
        is_running: status.is_running(),
        volume: status.volume,
    }))
}

/// POST /api/v1/volume
pub async fn set_volume(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VolumeRequest>,
) -> Result<Json<VolumeResponse>, ControlError> {
    let volume = match request.volume {
        Some(v) if (0..=i64::from(MAX_VOLUME)).contains(&v) => v as u8,
        other => {
            warn!(volume = ?other, "Rejecting invalid volume");
            return Err(control_error(
                StatusCode::BAD_REQUEST,
                ControlResponse::err("Volume is not valid"),
            ));
        }
    };

    let gateway = gateway(&state)?;
    let reported = gateway
        .set_volume(volume)
        .await
        .map_err(|e| gateway_error("Failed to set volume", e))?;

    Ok(Json(VolumeResponse { volume: reported }))
}
