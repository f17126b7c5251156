//! Posts API handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Post, PostComment, PostCreate, PostWithCounts};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::post;
use crate::utils::validation::{
    MAX_CONTENT_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    20
}

/// GET /api/posts
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<PostWithCounts>>> {
    let posts = post::find_all(&state.pool, query.limit, query.offset).await?;
    Ok(Json(posts))
}

/// POST /api/posts
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<PostCreate>,
) -> AppResult<Json<Post>> {
    validate_required_text(&payload.content, "content", MAX_CONTENT_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;

    let created = post::create(
        &state.pool,
        current_user.id,
        &current_user.display_name,
        payload,
    )
    .await?;
    Ok(Json(created))
}

/// DELETE /api/posts/:id - author or admin
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let existing = post::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Post {id}")))?;

    if existing.author_id != current_user.id && !current_user.is_admin() {
        return Err(AppError::forbidden("Only the author or an admin can delete a post"));
    }

    let removed = post::delete(&state.pool, id).await?;
    Ok(Json(removed))
}

/// POST /api/posts/:id/like
pub async fn like(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    post::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Post {id}")))?;
    let liked = post::like(&state.pool, id, current_user.id).await?;
    Ok(Json(liked))
}

/// DELETE /api/posts/:id/like
pub async fn unlike(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let unliked = post::unlike(&state.pool, id, current_user.id).await?;
    Ok(Json(unliked))
}

#[derive(Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

/// POST /api/posts/:id/comments
pub async fn add_comment(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<CommentRequest>,
) -> AppResult<Json<PostComment>> {
    validate_required_text(&payload.content, "content", MAX_CONTENT_LEN)?;

    post::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Post {id}")))?;

    let comment = post::add_comment(
        &state.pool,
        id,
        current_user.id,
        &current_user.display_name,
        &payload.content,
    )
    .await?;
    Ok(Json(comment))
}

/// GET /api/posts/:id/comments
pub async fn comments(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<PostComment>>> {
    let comments = post::comments_for_post(&state.pool, id).await?;
    Ok(Json(comments))
}
