//! System API handlers

use axum::{
    Json,
    extract::{Extension, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Serialize)]
pub struct StatusResponse {
    pub online: bool,
    pub pending_attendance: u64,
    pub version: &'static str,
}

/// GET /api/system/status
pub async fn status(State(state): State<ServerState>) -> AppResult<Json<StatusResponse>> {
    let pending = state
        .offline_queue
        .pending_count()
        .map_err(|e| AppError::internal(e.to_string()))?;

    Ok(Json(StatusResponse {
        online: state.connectivity.is_online(),
        pending_attendance: pending,
        version: env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Deserialize)]
pub struct ConnectivityRequest {
    pub online: bool,
}

/// PUT /api/system/connectivity - flip the station's online flag
///
/// Flipping to online wakes the sync worker, which drains the offline
/// queue.
pub async fn set_connectivity(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ConnectivityRequest>,
) -> AppResult<Json<bool>> {
    state.connectivity.set_online(payload.online);
    tracing::info!(
        online = payload.online,
        by = %current_user.username,
        "Connectivity flag changed"
    );
    Ok(Json(state.connectivity.is_online()))
}
