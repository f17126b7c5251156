//! Post Repository (feed, likes, comments)

use shared::models::{Post, PostComment, PostCreate, PostWithCounts};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const POST_WITH_COUNTS_SELECT: &str = "SELECT p.id, p.author_id, p.author_name, p.content, p.image_url, (SELECT COUNT(*) FROM post_like pl WHERE pl.post_id = p.id) AS like_count, (SELECT COUNT(*) FROM post_comment pc WHERE pc.post_id = p.id) AS comment_count, p.created_at, p.updated_at FROM post p";

pub async fn find_all(pool: &SqlitePool, limit: i32, offset: i32) -> RepoResult<Vec<PostWithCounts>> {
    let sql = format!("{POST_WITH_COUNTS_SELECT} ORDER BY p.created_at DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, PostWithCounts>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Post>> {
    let row = sqlx::query_as::<_, Post>(
        "SELECT id, author_id, author_name, content, image_url, created_at, updated_at FROM post WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    author_id: i64,
    author_name: &str,
    data: PostCreate,
) -> RepoResult<Post> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO post (id, author_id, author_name, content, image_url, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .bind(id)
    .bind(author_id)
    .bind(author_name)
    .bind(&data.content)
    .bind(&data.image_url)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create post".into()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM post WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Like a post; returns false when the user already liked it
pub async fn like(pool: &SqlitePool, post_id: i64, user_id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "INSERT OR IGNORE INTO post_like (post_id, user_id, created_at) VALUES (?1, ?2, ?3)",
    )
    .bind(post_id)
    .bind(user_id)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn unlike(pool: &SqlitePool, post_id: i64, user_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM post_like WHERE post_id = ? AND user_id = ?")
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn add_comment(
    pool: &SqlitePool,
    post_id: i64,
    author_id: i64,
    author_name: &str,
    content: &str,
) -> RepoResult<PostComment> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO post_comment (id, post_id, author_id, author_name, content, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(post_id)
    .bind(author_id)
    .bind(author_name)
    .bind(content)
    .bind(now)
    .execute(pool)
    .await?;

    let row = sqlx::query_as::<_, PostComment>(
        "SELECT id, post_id, author_id, author_name, content, created_at FROM post_comment WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| RepoError::Database("Failed to create comment".into()))
}

pub async fn comments_for_post(pool: &SqlitePool, post_id: i64) -> RepoResult<Vec<PostComment>> {
    let rows = sqlx::query_as::<_, PostComment>(
        "SELECT id, post_id, author_id, author_name, content, created_at FROM post_comment WHERE post_id = ? ORDER BY created_at",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
