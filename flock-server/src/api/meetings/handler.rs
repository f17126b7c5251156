//! Meeting API handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{Meeting, MeetingCreate, MeetingUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::meeting;
use crate::schedule;
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_TITLE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, time};

/// Query params for listing meetings
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/meetings
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Meeting>>> {
    let meetings = if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        let start_date = time::parse_date(&start)?;
        let end_date = time::parse_date(&end)?;
        meeting::find_by_date_range(
            &state.pool,
            time::day_start_millis(start_date),
            time::day_end_millis(end_date),
        )
        .await
    } else {
        meeting::find_all(&state.pool, query.limit, query.offset).await
    }?;

    Ok(Json(meetings))
}

/// GET /api/meetings/current - today's meeting for the check-in screen
pub async fn current(State(state): State<ServerState>) -> AppResult<Json<Option<Meeting>>> {
    let today = chrono::Local::now().date_naive();
    let found = meeting::find_current(
        &state.pool,
        time::day_start_millis(today),
        time::day_end_millis(today),
    )
    .await?;
    Ok(Json(found))
}

/// GET /api/meetings/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Meeting>> {
    let found = meeting::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Meeting {id}")))?;
    Ok(Json(found))
}

fn validate_times(start_time: i64, end_time: i64) -> AppResult<()> {
    if end_time <= start_time {
        return Err(AppError::validation("end_time must be after start_time"));
    }
    Ok(())
}

/// POST /api/meetings
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<MeetingCreate>,
) -> AppResult<Json<Meeting>> {
    validate_required_text(&payload.title, "title", MAX_TITLE_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_times(payload.start_time, payload.end_time)?;

    let created = meeting::create(&state.pool, payload).await?;
    tracing::info!(meeting_id = created.id, by = %current_user.username, "Meeting created");
    Ok(Json(created))
}

/// PUT /api/meetings/:id
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<MeetingUpdate>,
) -> AppResult<Json<Meeting>> {
    if let Some(title) = &payload.title {
        validate_required_text(title, "title", MAX_TITLE_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if let (Some(start), Some(end)) = (payload.start_time, payload.end_time) {
        validate_times(start, end)?;
    }

    let updated = meeting::update(&state.pool, id, payload).await?;
    tracing::info!(meeting_id = id, by = %current_user.username, "Meeting updated");
    Ok(Json(updated))
}

/// POST /api/meetings/:id/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Meeting>> {
    let cancelled = meeting::cancel(&state.pool, id).await?;
    tracing::info!(meeting_id = id, by = %current_user.username, "Meeting cancelled");
    Ok(Json(cancelled))
}

#[derive(Deserialize)]
pub struct GenerateRequest {
    /// Horizon in months
    #[serde(default = "default_months")]
    pub months: u32,
}

fn default_months() -> u32 {
    3
}

#[derive(Serialize)]
pub struct GenerateResponse {
    pub created: u64,
}

/// POST /api/meetings/generate - create the upcoming Friday meetings
pub async fn generate(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<GenerateRequest>,
) -> AppResult<Json<GenerateResponse>> {
    if payload.months == 0 || payload.months > 12 {
        return Err(AppError::validation("months must be between 1 and 12"));
    }

    let today = chrono::Local::now().date_naive();
    let meetings = schedule::friday_meetings(today, payload.months);
    let created = meeting::create_many(&state.pool, &meetings).await?;

    tracing::info!(created, by = %current_user.username, "Friday meetings generated");
    Ok(Json(GenerateResponse { created }))
}
