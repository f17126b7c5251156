//! Attendance API handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{AttendanceLog, CheckInMethod};

use crate::auth::CurrentUser;
use crate::checkin::CheckInOutcome;
use crate::core::ServerState;
use crate::db::repository::attendance;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

/// Query params for listing logs
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub meeting_id: Option<i64>,
    pub member_id: Option<i64>,
}

/// GET /api/attendance?meeting_id= | member_id=
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<AttendanceLog>>> {
    let logs = match (query.meeting_id, query.member_id) {
        (Some(meeting_id), _) => attendance::find_by_meeting(&state.pool, meeting_id).await?,
        (None, Some(member_id)) => attendance::find_by_member(&state.pool, member_id).await?,
        (None, None) => {
            return Err(AppError::validation(
                "Provide meeting_id or member_id to list attendance",
            ));
        }
    };
    Ok(Json(logs))
}

#[derive(Deserialize)]
pub struct CheckInRequest {
    /// 4-digit attendance code (QR payload, scanner output, or typed)
    pub code: String,
    pub meeting_id: Option<i64>,
    pub method: CheckInMethod,
    pub note: Option<String>,
}

#[derive(Serialize)]
pub struct CheckInResponse {
    pub member_id: i64,
    pub member_name: String,
    pub lateness_minutes: i64,
    /// True when the record went to the offline queue instead of the store
    pub queued: bool,
    pub log: Option<AttendanceLog>,
}

impl From<CheckInOutcome> for CheckInResponse {
    fn from(outcome: CheckInOutcome) -> Self {
        Self {
            member_id: outcome.member.id,
            member_name: outcome.member.full_name.clone(),
            lateness_minutes: outcome.lateness_minutes,
            queued: outcome.queued,
            log: outcome.log,
        }
    }
}

/// POST /api/attendance/check-in - code-based check-in (qr/scan/typed)
pub async fn check_in(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CheckInRequest>,
) -> AppResult<Json<CheckInResponse>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let outcome = state
        .recorder()
        .record_by_code(
            &payload.code,
            payload.meeting_id,
            payload.method,
            &current_user.username,
            payload.note,
        )
        .await?;

    Ok(Json(outcome.into()))
}

#[derive(Deserialize)]
pub struct ManualCheckInRequest {
    pub member_id: i64,
    pub meeting_id: Option<i64>,
    pub note: Option<String>,
}

/// POST /api/attendance/manual - operator picked the member from the list
pub async fn manual_check_in(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ManualCheckInRequest>,
) -> AppResult<Json<CheckInResponse>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let outcome = state
        .recorder()
        .record_member(
            payload.member_id,
            payload.meeting_id,
            &current_user.username,
            payload.note,
        )
        .await?;

    Ok(Json(outcome.into()))
}

/// POST /api/attendance/:id/check-out
pub async fn check_out(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<AttendanceLog>> {
    let log = attendance::check_out(&state.pool, id).await?;
    tracing::info!(log_id = id, by = %current_user.username, "Member checked out");
    Ok(Json(log))
}
