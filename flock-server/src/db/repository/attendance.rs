//! Attendance Log Repository
//!
//! `insert` is the single persistence step for check-ins: the online path
//! calls it directly, and the offline queue replays through it at drain
//! time. The composite UNIQUE(member_id, meeting_id) index surfaces racing
//! duplicates as `RepoError::Duplicate`.

use shared::models::{AttendanceLog, NewAttendanceLog};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const LOG_SELECT: &str = "SELECT id, member_id, meeting_id, check_in_time, check_out_time, method, lateness_minutes, recorded_by, note, created_at FROM attendance_log";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<AttendanceLog>> {
    let sql = format!("{LOG_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, AttendanceLog>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_meeting(pool: &SqlitePool, meeting_id: i64) -> RepoResult<Vec<AttendanceLog>> {
    let sql = format!("{LOG_SELECT} WHERE meeting_id = ? ORDER BY check_in_time");
    let rows = sqlx::query_as::<_, AttendanceLog>(&sql)
        .bind(meeting_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_member(pool: &SqlitePool, member_id: i64) -> RepoResult<Vec<AttendanceLog>> {
    let sql = format!("{LOG_SELECT} WHERE member_id = ? ORDER BY check_in_time DESC");
    let rows = sqlx::query_as::<_, AttendanceLog>(&sql)
        .bind(member_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Fast-path duplicate check; the unique index remains the authority
pub async fn exists(pool: &SqlitePool, member_id: i64, meeting_id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM attendance_log WHERE member_id = ? AND meeting_id = ?",
    )
    .bind(member_id)
    .bind(meeting_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn insert(pool: &SqlitePool, log: &NewAttendanceLog) -> RepoResult<AttendanceLog> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO attendance_log (id, member_id, meeting_id, check_in_time, check_out_time, method, lateness_minutes, recorded_by, note, created_at) VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(id)
    .bind(log.member_id)
    .bind(log.meeting_id)
    .bind(log.check_in_time)
    .bind(log.method.as_str())
    .bind(log.lateness_minutes)
    .bind(&log.recorded_by)
    .bind(&log.note)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to insert attendance log".into()))
}

/// Record a check-out once; a second attempt is a no-op error
pub async fn check_out(pool: &SqlitePool, id: i64) -> RepoResult<AttendanceLog> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE attendance_log SET check_out_time = ? WHERE id = ? AND check_out_time IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Attendance log {id} not found or already checked out"
        )));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Attendance log {id} not found")))
}

pub async fn count_for_meeting(pool: &SqlitePool, meeting_id: i64) -> RepoResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM attendance_log WHERE meeting_id = ?")
            .bind(meeting_id)
            .fetch_one(pool)
            .await?;
    Ok(count)
}
