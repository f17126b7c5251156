//! Authentication middleware
//!
//! Axum middleware for JWT authentication and admin gating.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService, resolve_role};
use crate::core::ServerState;
use crate::utils::AppError;

/// Require a valid bearer token on every `/api/` route except the public ones
///
/// On success a [`CurrentUser`] (with the role already resolved through the
/// admin-table fallback) is injected into the request extensions.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // CORS preflight never carries credentials
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API paths fall through to their own handling (404 etc.)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if path == "/api/auth/login" {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(target: "security", uri = %req.uri(), "Missing authorization header");
            return Err(AppError::Unauthorized);
        }
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(target: "security", error = %e, uri = %req.uri(), "Token rejected");
            return match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::TokenExpired),
                _ => Err(AppError::invalid_token("Invalid token")),
            };
        }
    };

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::invalid_token("Malformed subject claim"))?;
    let role = resolve_role(&claims.role, user_id, &state.pool).await?;

    let user = CurrentUser {
        id: user_id,
        username: claims.username,
        display_name: claims.display_name,
        role,
    };
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Require the admin role; layered on mutation routes
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;
    if !user.is_admin() {
        tracing::warn!(
            target: "security",
            user_id = user.id,
            username = %user.username,
            "Admin route denied"
        );
        return Err(AppError::forbidden("Admin role required"));
    }

    Ok(next.run(req).await)
}
