//! Check-in core
//!
//! Everything between a presented attendance code and a persisted (or
//! queued) attendance log:
//!
//! - [`code`] - 4-digit code format validation
//! - [`allocator`] - sequential, collision-free code allocation
//! - [`recorder`] - duplicate guard, lateness, online/offline routing
//! - [`offline_queue`] - durable buffer for check-ins taken while offline
//! - [`sync_worker`] - drains the queue when connectivity returns
//! - [`connectivity`] - the station's online/offline signal

pub mod allocator;
pub mod code;
pub mod connectivity;
pub mod offline_queue;
pub mod recorder;
pub mod sync_worker;

pub use allocator::CodeAllocator;
pub use connectivity::ConnectivityState;
pub use offline_queue::{DrainReport, OfflineQueue, QueueError};
pub use recorder::{AttendanceRecorder, CheckInOutcome};
pub use sync_worker::OfflineSyncWorker;

use thiserror::Error;

use crate::db::repository::RepoError;

/// Errors of the check-in pipeline
///
/// Each failure is scoped to the single check-in attempt; none is fatal to
/// the server.
#[derive(Debug, Error)]
pub enum CheckInError {
    #[error("Code must be exactly 4 digits, got {0:?}")]
    InvalidCodeFormat(String),

    #[error("No member holds code {0}")]
    MemberNotFound(String),

    #[error("Member {member_id} already checked in to meeting {meeting_id}")]
    AlreadyCheckedIn { member_id: i64, meeting_id: i64 },

    #[error("No meeting selected")]
    MeetingNotSelected,

    #[error("Meeting {0} not found")]
    MeetingNotFound(i64),

    #[error("All attendance codes from 1000 to 9999 are taken")]
    CodeRangeExhausted,

    #[error("Store error: {0}")]
    Store(#[from] RepoError),

    #[error("Offline queue error: {0}")]
    Queue(#[from] QueueError),
}
