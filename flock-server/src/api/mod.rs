//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness and detail probes (public)
//! - [`auth`] - operator login and identity
//! - [`members`] - member CRUD, search, code backfill
//! - [`meetings`] - meeting CRUD and the Friday generator
//! - [`attendance`] - check-in/check-out and logs
//! - [`posts`] - feed, likes, comments
//! - [`notifications`] - notification records and read tracking
//! - [`system`] - connectivity flag and station status

pub mod router;

pub mod attendance;
pub mod auth;
pub mod health;
pub mod meetings;
pub mod members;
pub mod notifications;
pub mod posts;
pub mod system;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
