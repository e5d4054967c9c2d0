//! Registration, login and profile endpoints.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::security::Validator;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use board_store::{NewUser, PublicUser, Role};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionData {
    pub user: PublicUser,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileData {
    pub user: PublicUser,
}

fn default_avatar(email: &str) -> String {
    format!("https://i.pravatar.cc/150?u={email}")
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiResponse<SessionData>, ApiError> {
    let Json(body) = payload?;

    let mut validator = Validator::new();
    let name = validator.text("name", &body.name, 2, 50, "Name must be between 2 and 50 characters");
    let email = validator.email("email", &body.email);
    validator.min_len(
        "password",
        &body.password,
        6,
        "Password must be at least 6 characters long",
    );
    validator.finish()?;

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::BadRequest("User already exists with this email".to_string()));
    }

    let hasher = state.passwords;
    let password = body.password;
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(ApiError::internal)?;

    let user = state
        .store
        .insert_user(NewUser {
            avatar: default_avatar(&email),
            name,
            email,
            password_hash,
            role: Role::User,
        })
        .await?;
    let token = state.tokens.issue(&user).map_err(ApiError::internal)?;

    info!("👤 Registered user {} <{}>", user.id, user.email);
    Ok(ApiResponse::created(
        "User registered successfully",
        SessionData {
            user: user.to_public(),
            token,
        },
    ))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiResponse<SessionData>, ApiError> {
    let Json(body) = payload?;

    let mut validator = Validator::new();
    let email = validator.email("email", &body.email);
    validator.required("password", &body.password, "Password is required");
    validator.finish()?;

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let Some(user) = state.store.find_user_by_email(&email).await? else {
        return Err(invalid());
    };
    if !user.is_active {
        return Err(ApiError::Unauthorized("User account is deactivated.".to_string()));
    }

    let hasher = state.passwords;
    let password = body.password;
    let stored = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
        .await
        .map_err(ApiError::internal)?;
    if !matches {
        warn!("🔒 Failed login for {}", email);
        return Err(invalid());
    }

    let token = state.tokens.issue(&user).map_err(ApiError::internal)?;
    info!("🔓 User {} logged in", user.id);
    Ok(ApiResponse::ok(
        "Login successful",
        SessionData {
            user: user.to_public(),
            token,
        },
    ))
}

/// `GET /api/auth/profile`
pub async fn profile(AuthUser(user): AuthUser) -> ApiResponse<ProfileData> {
    ApiResponse::ok(
        "Profile retrieved successfully",
        ProfileData {
            user: user.to_public(),
        },
    )
}

/// `POST /api/auth/logout`
///
/// Tokens are stateless, so there is nothing to revoke; the client discards
/// its copy.
pub async fn logout(AuthUser(user): AuthUser) -> ApiResponse<()> {
    info!("👋 User {} logged out", user.id);
    ApiResponse::message("Logout successful")
}
