//! Attendance API module
//!
//! All attendance routes are admin-gated: check-in is performed by the
//! operator running the station, never by members themselves.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/attendance", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/check-in", post(handler::check_in))
        .route("/manual", post(handler::manual_check_in))
        .route("/{id}/check-out", post(handler::check_out))
        .layer(middleware::from_fn(require_admin))
}
