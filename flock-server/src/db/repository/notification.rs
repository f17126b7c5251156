//! Notification Repository
//!
//! Stores notification records and per-user read markers. Targeted
//! notifications keep their recipient list as a JSON array in `target_ids`
//! and are filtered with SQLite's `json_each`.

use shared::models::{Notification, NotificationCreate};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const NOTIFICATION_SELECT: &str = "SELECT id, title, message, image_url, audience, target_ids, created_by, created_at FROM notification";

pub async fn create(
    pool: &SqlitePool,
    data: &NotificationCreate,
    created_by: &str,
) -> RepoResult<Notification> {
    if !matches!(data.audience.as_str(), "all" | "individuals") {
        return Err(RepoError::Validation(format!(
            "Unknown audience: {}",
            data.audience
        )));
    }
    if data.audience == "individuals" && data.target_ids.as_deref().is_none_or(|t| t.is_empty()) {
        return Err(RepoError::Validation(
            "Targeted notification needs at least one recipient".into(),
        ));
    }

    let target_json = match &data.target_ids {
        Some(ids) => Some(
            serde_json::to_string(ids)
                .map_err(|e| RepoError::Database(format!("Failed to encode targets: {e}")))?,
        ),
        None => None,
    };

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO notification (id, title, message, image_url, audience, target_ids, created_by, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(id)
    .bind(&data.title)
    .bind(&data.message)
    .bind(&data.image_url)
    .bind(&data.audience)
    .bind(&target_json)
    .bind(created_by)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create notification".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Notification>> {
    let sql = format!("{NOTIFICATION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Notification>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Notifications visible to a user: broadcast ones plus those targeting them
pub async fn find_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Notification>> {
    let sql = format!(
        "{NOTIFICATION_SELECT} WHERE audience = 'all' OR (audience = 'individuals' AND EXISTS (SELECT 1 FROM json_each(notification.target_ids) WHERE json_each.value = ?)) ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, Notification>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn mark_read(pool: &SqlitePool, notification_id: i64, user_id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT OR IGNORE INTO notification_read (notification_id, user_id, read_at) VALUES (?1, ?2, ?3)",
    )
    .bind(notification_id)
    .bind(user_id)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn unread_count(pool: &SqlitePool, user_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notification n WHERE (n.audience = 'all' OR (n.audience = 'individuals' AND EXISTS (SELECT 1 FROM json_each(n.target_ids) WHERE json_each.value = ?1))) AND NOT EXISTS (SELECT 1 FROM notification_read r WHERE r.notification_id = n.id AND r.user_id = ?1)",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
