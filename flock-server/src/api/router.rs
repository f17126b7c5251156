//! Router assembly

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

/// HTTP request log middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    tracing::info!(target: "http_access", "{} {} {}", method, uri, response.status());
    response
}

/// Compose every resource router into the application
///
/// `require_auth` is applied router-wide and skips the public routes
/// itself; admin gating happens per route inside the resource modules.
pub fn build_app(state: ServerState) -> Router {
    Router::<ServerState>::new()
        // Core
        .merge(crate::api::health::router())
        .merge(crate::api::auth::router())
        .merge(crate::api::system::router())
        // Data model APIs
        .merge(crate::api::members::router())
        .merge(crate::api::meetings::router())
        .merge(crate::api::attendance::router())
        .merge(crate::api::posts::router())
        .merge(crate::api::notifications::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
}
