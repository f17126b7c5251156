//! System API module (connectivity flag, station status)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/system", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new().route("/status", get(handler::status));

    let manage_routes = Router::new()
        .route("/connectivity", put(handler::set_connectivity))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
