//! Meeting Repository

use shared::models::{Meeting, MeetingCreate, MeetingUpdate};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const MEETING_SELECT: &str = "SELECT id, title, description, location, kind, status, date, start_time, end_time, created_at, updated_at FROM meeting";

pub async fn find_all(pool: &SqlitePool, limit: i32, offset: i32) -> RepoResult<Vec<Meeting>> {
    let sql = format!("{MEETING_SELECT} ORDER BY start_time DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, Meeting>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Meeting>> {
    let sql = format!("{MEETING_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Meeting>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_date_range(
    pool: &SqlitePool,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<Vec<Meeting>> {
    let sql = format!("{MEETING_SELECT} WHERE date >= ? AND date < ? ORDER BY start_time");
    let rows = sqlx::query_as::<_, Meeting>(&sql)
        .bind(start_millis)
        .bind(end_millis)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// The meeting the check-in screen should default to: today's earliest
/// scheduled meeting, if any
pub async fn find_current(
    pool: &SqlitePool,
    day_start: i64,
    day_end: i64,
) -> RepoResult<Option<Meeting>> {
    let sql = format!(
        "{MEETING_SELECT} WHERE date >= ? AND date < ? AND status = 'scheduled' ORDER BY start_time LIMIT 1"
    );
    let row = sqlx::query_as::<_, Meeting>(&sql)
        .bind(day_start)
        .bind(day_end)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: MeetingCreate) -> RepoResult<Meeting> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO meeting (id, title, description, location, kind, status, date, start_time, end_time, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 'scheduled', ?6, ?7, ?8, ?9, ?9)",
    )
    .bind(id)
    .bind(&data.title)
    .bind(&data.description)
    .bind(&data.location)
    .bind(&data.kind)
    .bind(data.date)
    .bind(data.start_time)
    .bind(data.end_time)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create meeting".into()))
}

/// Bulk insert for the schedule generator; returns how many were created
pub async fn create_many(pool: &SqlitePool, meetings: &[MeetingCreate]) -> RepoResult<u64> {
    let mut created = 0;
    for data in meetings {
        create(pool, data.clone()).await?;
        created += 1;
    }
    Ok(created)
}

pub async fn update(pool: &SqlitePool, id: i64, data: MeetingUpdate) -> RepoResult<Meeting> {
    if let Some(status) = &data.status
        && !matches!(status.as_str(), "scheduled" | "completed" | "cancelled")
    {
        return Err(RepoError::Validation(format!(
            "Unknown meeting status: {status}"
        )));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE meeting SET title = COALESCE(?1, title), description = COALESCE(?2, description), location = COALESCE(?3, location), kind = COALESCE(?4, kind), status = COALESCE(?5, status), date = COALESCE(?6, date), start_time = COALESCE(?7, start_time), end_time = COALESCE(?8, end_time), updated_at = ?9 WHERE id = ?10",
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(&data.location)
    .bind(&data.kind)
    .bind(&data.status)
    .bind(data.date)
    .bind(data.start_time)
    .bind(data.end_time)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Meeting {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Meeting {id} not found")))
}

/// Meetings are never hard-deleted; cancellation keeps attendance history intact
pub async fn cancel(pool: &SqlitePool, id: i64) -> RepoResult<Meeting> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE meeting SET status = 'cancelled', updated_at = ? WHERE id = ? AND status = 'scheduled'",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Meeting {id} not found or not cancellable"
        )));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Meeting {id} not found")))
}
