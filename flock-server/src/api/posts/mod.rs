//! Posts API module (feed)

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/posts", routes())
}

fn routes() -> Router<ServerState> {
    // The feed is open to every authenticated user; authorship rules are
    // enforced in the handlers (delete = author or admin)
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", delete(handler::delete))
        .route("/{id}/like", post(handler::like).delete(handler::unlike))
        .route(
            "/{id}/comments",
            get(handler::comments).post(handler::add_comment),
        )
}
