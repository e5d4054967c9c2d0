//! Request authentication.

use super::token::TokenError;
use crate::error::ApiError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use board_store::User;
use tracing::debug;

/// The authenticated caller of a request.
///
/// Extracting this from a request verifies the bearer token and loads the
/// user it names, rejecting the request with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Access denied. No token provided.".to_string()))?;

        let claims = state.tokens.verify(token).map_err(|e| {
            debug!("Rejected token: {}", e);
            match e {
                TokenError::Expired => ApiError::Unauthorized("Token expired.".to_string()),
                _ => ApiError::Unauthorized("Invalid token.".to_string()),
            }
        })?;

        let user = state.store.find_user(claims.id).await?.ok_or_else(|| {
            ApiError::Unauthorized("Token is valid but user no longer exists.".to_string())
        })?;

        if !user.is_active {
            return Err(ApiError::Unauthorized("User account is deactivated.".to_string()));
        }

        Ok(AuthUser(user))
    }
}

/// The token from an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    if !value.starts_with("Bearer") {
        return None;
    }
    value.split(' ').nth(1).filter(|token| !token.is_empty())
}
