//! Attendance Recorder
//!
//! The single entry point for all three check-in channels (manual, QR,
//! scan). Resolves the member, guards against duplicates, computes
//! lateness, and either persists directly or routes through the offline
//! queue. The caller gets a "saved" outcome either way, with `queued`
//! telling the paths apart.

use std::sync::Arc;

use shared::models::{AttendanceLog, CheckInMethod, Meeting, Member, NewAttendanceLog};
use sqlx::SqlitePool;

use super::{CheckInError, ConnectivityState, OfflineQueue, code};
use crate::db::repository::{RepoError, attendance, meeting, member};
use crate::utils::time;

/// Result of a successful check-in attempt
#[derive(Debug)]
pub struct CheckInOutcome {
    pub member: Member,
    /// The persisted log, or None while the record sits in the offline queue
    pub log: Option<AttendanceLog>,
    pub lateness_minutes: i64,
    pub queued: bool,
}

#[derive(Clone)]
pub struct AttendanceRecorder {
    pool: SqlitePool,
    queue: Arc<OfflineQueue>,
    connectivity: ConnectivityState,
}

impl AttendanceRecorder {
    pub fn new(pool: SqlitePool, queue: Arc<OfflineQueue>, connectivity: ConnectivityState) -> Self {
        Self {
            pool,
            queue,
            connectivity,
        }
    }

    /// Check a member in by presented code (QR payload, scanner output, or
    /// typed entry)
    pub async fn record_by_code(
        &self,
        raw_code: &str,
        meeting_id: Option<i64>,
        method: CheckInMethod,
        recorded_by: &str,
        note: Option<String>,
    ) -> Result<CheckInOutcome, CheckInError> {
        let code = code::validate(raw_code)
            .ok_or_else(|| CheckInError::InvalidCodeFormat(raw_code.to_string()))?;
        let meeting = self.resolve_meeting(meeting_id).await?;
        let member = member::find_by_code(&self.pool, code)
            .await?
            .ok_or_else(|| CheckInError::MemberNotFound(code.to_string()))?;

        self.record(member, meeting, method, recorded_by, note).await
    }

    /// Check a member in by id (operator picked them from the list)
    pub async fn record_member(
        &self,
        member_id: i64,
        meeting_id: Option<i64>,
        recorded_by: &str,
        note: Option<String>,
    ) -> Result<CheckInOutcome, CheckInError> {
        let meeting = self.resolve_meeting(meeting_id).await?;
        let member = member::find_by_id(&self.pool, member_id)
            .await?
            .filter(|m| m.is_active)
            .ok_or_else(|| CheckInError::MemberNotFound(member_id.to_string()))?;

        self.record(member, meeting, CheckInMethod::Manual, recorded_by, note)
            .await
    }

    async fn resolve_meeting(&self, meeting_id: Option<i64>) -> Result<Meeting, CheckInError> {
        let id = meeting_id.ok_or(CheckInError::MeetingNotSelected)?;
        meeting::find_by_id(&self.pool, id)
            .await?
            .ok_or(CheckInError::MeetingNotFound(id))
    }

    async fn record(
        &self,
        member: Member,
        meeting: Meeting,
        method: CheckInMethod,
        recorded_by: &str,
        note: Option<String>,
    ) -> Result<CheckInOutcome, CheckInError> {
        // Fast path; the unique index on (member_id, meeting_id) catches
        // whatever races past this.
        if attendance::exists(&self.pool, member.id, meeting.id).await? {
            return Err(CheckInError::AlreadyCheckedIn {
                member_id: member.id,
                meeting_id: meeting.id,
            });
        }

        let now = shared::util::now_millis();
        let lateness = time::lateness_minutes(now, meeting.start_time);
        let log = NewAttendanceLog {
            member_id: member.id,
            meeting_id: meeting.id,
            check_in_time: now,
            method,
            lateness_minutes: lateness,
            recorded_by: recorded_by.to_string(),
            note,
        };

        if !self.connectivity.is_online() {
            self.queue.enqueue(&log)?;
            return Ok(CheckInOutcome {
                member,
                log: None,
                lateness_minutes: lateness,
                queued: true,
            });
        }

        match attendance::insert(&self.pool, &log).await {
            Ok(saved) => {
                tracing::info!(
                    member_id = member.id,
                    meeting_id = meeting.id,
                    method = %method,
                    lateness,
                    "Attendance recorded"
                );
                Ok(CheckInOutcome {
                    member,
                    log: Some(saved),
                    lateness_minutes: lateness,
                    queued: false,
                })
            }
            Err(RepoError::Duplicate(_)) => Err(CheckInError::AlreadyCheckedIn {
                member_id: member.id,
                meeting_id: meeting.id,
            }),
            Err(e) => Err(CheckInError::Store(e)),
        }
    }
}
