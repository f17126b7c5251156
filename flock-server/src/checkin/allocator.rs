//! Sequential attendance code allocation
//!
//! Allocation is a single-row compare-and-swap on the `code_counter` table:
//! one `UPDATE ... RETURNING` statement, atomic under SQLite's serialized
//! writers, so two concurrent registrations can never receive the same
//! code. The legacy scheme (query the highest member code, add one, fall
//! back to a random code when the read fails) loses updates under
//! concurrency and can silently violate uniqueness; here a store failure
//! fails the allocation instead.

use sqlx::SqlitePool;

use super::CheckInError;
use super::code::{self, CODE_MAX};

/// Allocates attendance codes from the counter row
#[derive(Clone)]
pub struct CodeAllocator {
    pool: SqlitePool,
}

impl CodeAllocator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Hand out the next code
    ///
    /// Returns [`CheckInError::CodeRangeExhausted`] once "9999" has been
    /// allocated; codes are never reused while older members keep theirs.
    pub async fn next_code(&self) -> Result<String, CheckInError> {
        let value: Option<i64> = sqlx::query_scalar(
            "UPDATE code_counter SET value = value + 1 WHERE id = 0 AND value < ?1 RETURNING value",
        )
        .bind(CODE_MAX as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(crate::db::repository::RepoError::from)?;

        match value {
            Some(v) => Ok(code::format_code(v as u32)),
            None => Err(CheckInError::CodeRangeExhausted),
        }
    }

    /// Raise the counter to at least the highest code already present
    ///
    /// Run at startup so imported members (whose codes predate the counter)
    /// never collide with fresh allocations.
    pub async fn sync_floor(&self) -> Result<(), CheckInError> {
        sqlx::query(
            "UPDATE code_counter SET value = MAX(value, COALESCE((SELECT MAX(CAST(attendance_code AS INTEGER)) FROM member WHERE attendance_code GLOB '[1-9][0-9][0-9][0-9]'), 999)) WHERE id = 0",
        )
        .execute(&self.pool)
        .await
        .map_err(crate::db::repository::RepoError::from)?;
        Ok(())
    }

    /// Assign codes to every member missing one; returns how many were fixed
    ///
    /// This is the import-repair operation: members created through bulk
    /// import may carry no code or a malformed one.
    pub async fn backfill_missing(&self) -> Result<u64, CheckInError> {
        use crate::db::repository::member;

        self.sync_floor().await?;

        let missing = member::find_missing_codes(&self.pool).await?;
        let mut fixed = 0;
        for m in missing {
            let code = self.next_code().await?;
            member::assign_code(&self.pool, m.id, &code).await?;
            tracing::info!(member_id = m.id, code = %code, "Backfilled attendance code");
            fixed += 1;
        }
        Ok(fixed)
    }
}
