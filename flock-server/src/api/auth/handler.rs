//! Auth API handlers

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{
    Json,
    extract::{Extension, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::{CurrentUser, resolve_role};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::{AppError, AppResult};

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    pub role: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let account = user::find_by_username(&state.pool, &payload.username)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&payload.password, &account.password_hash) {
        tracing::warn!(target: "security", username = %payload.username, "Failed login attempt");
        return Err(AppError::invalid_credentials());
    }

    // Bake the resolved role into the token; the middleware re-resolves on
    // every request so later promotions still take effect
    let role = resolve_role(&account.role, account.id, &state.pool).await?;
    let token = state
        .jwt_service
        .generate_token(account.id, &account.username, &account.display_name, &role)
        .map_err(|e| AppError::internal(e.to_string()))?;

    tracing::info!(username = %account.username, role = %role, "Operator logged in");

    Ok(Json(LoginResponse {
        token,
        user_id: account.id,
        username: account.username,
        display_name: account.display_name,
        role,
    }))
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    pub role: String,
}

/// GET /api/auth/me
pub async fn me(Extension(current_user): Extension<CurrentUser>) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: current_user.id,
        username: current_user.username,
        display_name: current_user.display_name,
        role: current_user.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip() {
        let hash = hash_password("correct horse battery staple").expect("hashing works");
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
