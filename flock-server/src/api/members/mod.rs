//! Member API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/members", routes())
}

fn routes() -> Router<ServerState> {
    // Read routes: any authenticated operator
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/search", get(handler::search))
        .route("/{id}", get(handler::get_by_id));

    // Mutations: admin only
    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/backfill-codes", post(handler::backfill_codes))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
