//! Member API handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Serialize;
use shared::models::{Member, MemberCreate, MemberUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::member;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_PHONE_LEN, MAX_URL_LEN, validate_class_stage,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(serde::Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

fn validate_member_payload(data: &MemberCreate) -> AppResult<()> {
    validate_required_text(&data.full_name, "full_name", MAX_NAME_LEN)?;
    validate_required_text(&data.phone_primary, "phone_primary", MAX_PHONE_LEN)?;
    validate_optional_text(&data.phone_secondary, "phone_secondary", MAX_PHONE_LEN)?;
    validate_required_text(&data.address, "address", MAX_ADDRESS_LEN)?;
    validate_required_text(&data.confessor_name, "confessor_name", MAX_NAME_LEN)?;
    validate_optional_text(&data.photo_url, "photo_url", MAX_URL_LEN)?;
    validate_optional_text(&data.notes, "notes", MAX_NOTE_LEN)?;
    validate_class_stage(&data.class_stage)?;
    Ok(())
}

/// GET /api/members
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Member>>> {
    let members = member::find_all(&state.pool).await?;
    Ok(Json(members))
}

/// GET /api/members/search?q=...
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Member>>> {
    let members = member::search(&state.pool, &query.q).await?;
    Ok(Json(members))
}

/// GET /api/members/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Member>> {
    let found = member::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Member {id}")))?;
    Ok(Json(found))
}

/// POST /api/members - allocates the attendance code inline
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<MemberCreate>,
) -> AppResult<Json<Member>> {
    validate_member_payload(&payload)?;

    let code = state.allocator().next_code().await?;
    let created = member::create(&state.pool, payload, &code).await?;

    tracing::info!(
        member_id = created.id,
        code = %code,
        by = %current_user.username,
        "Member created"
    );
    Ok(Json(created))
}

/// PUT /api/members/:id
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<MemberUpdate>,
) -> AppResult<Json<Member>> {
    if let Some(name) = &payload.full_name {
        validate_required_text(name, "full_name", MAX_NAME_LEN)?;
    }
    if let Some(phone) = &payload.phone_primary {
        validate_required_text(phone, "phone_primary", MAX_PHONE_LEN)?;
    }
    if let Some(stage) = &payload.class_stage {
        validate_class_stage(stage)?;
    }
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.photo_url, "photo_url", MAX_URL_LEN)?;

    let updated = member::update(&state.pool, id, payload).await?;

    tracing::info!(member_id = id, by = %current_user.username, "Member updated");
    Ok(Json(updated))
}

/// DELETE /api/members/:id (soft delete)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let removed = member::delete(&state.pool, id).await?;
    if removed {
        tracing::info!(member_id = id, by = %current_user.username, "Member deactivated");
    }
    Ok(Json(removed))
}

#[derive(Serialize)]
pub struct BackfillResponse {
    pub assigned: u64,
}

/// POST /api/members/backfill-codes - repair imported members without codes
pub async fn backfill_codes(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<BackfillResponse>> {
    let assigned = state.allocator().backfill_missing().await?;
    tracing::info!(assigned, by = %current_user.username, "Attendance code backfill finished");
    Ok(Json(BackfillResponse { assigned }))
}
