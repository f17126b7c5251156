//! Shared types for the Flock workspace
//!
//! Data models and small helpers used by the check-in station server and
//! by tooling. DB row types gate their `sqlx::FromRow` derive behind the
//! `db` feature so API clients can depend on this crate without pulling in
//! the database stack.

pub mod models;
pub mod util;

pub use models::{
    AttendanceLog, CheckInMethod, Meeting, MeetingCreate, MeetingUpdate, Member, MemberCreate,
    MemberUpdate, NewAttendanceLog, Notification, NotificationCreate, Post, PostComment,
    PostCreate, PostWithCounts, User,
};
