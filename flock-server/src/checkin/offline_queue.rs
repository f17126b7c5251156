//! redb-backed offline attendance queue
//!
//! Check-ins taken while the station is offline land here and survive
//! restarts and power loss (redb commits are durable before `commit()`
//! returns). Records leave the queue only after a confirmed write to the
//! main store; a failed replay stays queued for the next drain.
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `pending_attendance` | snowflake id | JSON-serialized `NewAttendanceLog` |

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use shared::models::NewAttendanceLog;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::db::repository::{RepoError, attendance};

const PENDING_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("pending_attendance");

/// Queue storage errors
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type QueueResult<T> = Result<T, QueueError>;

/// Outcome of one drain pass
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Replayed and confirmed written
    pub synced: u64,
    /// Dropped because the member was already checked in online meanwhile
    pub duplicates_dropped: u64,
    /// Left queued for the next connectivity event
    pub failed: u64,
}

/// Durable offline attendance buffer
pub struct OfflineQueue {
    db: Arc<Database>,
}

impl OfflineQueue {
    /// Open or create the queue database at the given path
    pub fn open(path: impl AsRef<Path>) -> QueueResult<Self> {
        let db = Database::create(path)?;

        // Ensure the table exists so pending_count works on a fresh file
        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(PENDING_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Append a pending check-in; returns its queue key
    pub fn enqueue(&self, log: &NewAttendanceLog) -> QueueResult<i64> {
        let key = shared::util::snowflake_id();
        let bytes = serde_json::to_vec(log)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PENDING_TABLE)?;
            table.insert(key, bytes.as_slice())?;
        }
        write_txn.commit()?;

        tracing::info!(
            member_id = log.member_id,
            meeting_id = log.meeting_id,
            "Attendance queued offline"
        );
        Ok(key)
    }

    /// Number of records awaiting sync
    pub fn pending_count(&self) -> QueueResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PENDING_TABLE)?;
        Ok(table.len()?)
    }

    /// Snapshot of all pending records, oldest first
    pub fn pending(&self) -> QueueResult<Vec<(i64, NewAttendanceLog)>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PENDING_TABLE)?;

        let mut items = Vec::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            let log: NewAttendanceLog = serde_json::from_slice(value.value())?;
            items.push((key.value(), log));
        }
        Ok(items)
    }

    fn remove(&self, key: i64) -> QueueResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PENDING_TABLE)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Replay every pending record through the attendance store
    ///
    /// Each record is removed only after its insert is confirmed. Records
    /// that turn out to be duplicates (checked in online while this one sat
    /// queued) are dropped, since retrying them forever would wedge the
    /// queue. Any other failure leaves the record for the next drain.
    pub async fn drain(&self, pool: &SqlitePool) -> QueueResult<DrainReport> {
        let pending = self.pending()?;
        let mut report = DrainReport::default();

        for (key, log) in pending {
            match attendance::insert(pool, &log).await {
                Ok(saved) => {
                    self.remove(key)?;
                    report.synced += 1;
                    tracing::info!(
                        log_id = saved.id,
                        member_id = log.member_id,
                        "Offline attendance synced"
                    );
                }
                Err(RepoError::Duplicate(_)) => {
                    self.remove(key)?;
                    report.duplicates_dropped += 1;
                    tracing::warn!(
                        member_id = log.member_id,
                        meeting_id = log.meeting_id,
                        "Dropping queued duplicate check-in"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(
                        member_id = log.member_id,
                        error = %e,
                        "Failed to sync queued attendance, keeping it queued"
                    );
                }
            }
        }

        Ok(report)
    }
}
