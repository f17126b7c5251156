//! Notification API handlers
//!
//! Records only; pushing them to devices is outside this system.

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use serde::Serialize;
use shared::models::{Notification, NotificationCreate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::notification;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_TITLE_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};

/// GET /api/notifications - the current user's visible notifications
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = notification::find_for_user(&state.pool, current_user.id).await?;
    Ok(Json(notifications))
}

/// POST /api/notifications
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<NotificationCreate>,
) -> AppResult<Json<Notification>> {
    validate_required_text(&payload.title, "title", MAX_TITLE_LEN)?;
    validate_required_text(&payload.message, "message", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;

    let created = notification::create(&state.pool, &payload, &current_user.username).await?;
    tracing::info!(
        notification_id = created.id,
        audience = %created.audience,
        by = %current_user.username,
        "Notification created"
    );
    Ok(Json(created))
}

/// POST /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    notification::mark_read(&state.pool, id, current_user.id).await?;
    Ok(Json(true))
}

#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub unread: i64,
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UnreadCountResponse>> {
    let unread = notification::unread_count(&state.pool, current_user.id).await?;
    Ok(Json(UnreadCountResponse { unread }))
}
