//! Route table and middleware stack.

use crate::error::ServerError;
use crate::handlers::{self, auth, comments, health, posts};
use crate::security::{rate_limit, with_security_headers};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the full application router for `state`.
///
/// Layers, outermost first: request tracing, CORS, security headers, body
/// size limit, then per-IP rate limiting.
pub fn build_router(state: AppState) -> Result<Router, ServerError> {
    let config = state.config.clone();

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/profile", get(auth::profile))
        .route("/logout", post(auth::logout));

    let mut router = Router::new()
        .route("/api/health", get(health::health))
        .nest("/api/auth", auth_routes)
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route("/api/posts/:id/comments", get(posts::post_with_comments))
        .route("/api/posts/:id/thread", get(posts::post_thread))
        .route("/api/posts/:id/upvote", post(posts::upvote_post))
        .route("/api/comments", post(comments::create_comment))
        .route("/api/comments/:id/upvote", post(comments::upvote_comment))
        .fallback(handlers::not_found);

    if config.security.enable_rate_limiting {
        router = router.layer(middleware::from_fn_with_state(state.clone(), rate_limit));
    }

    let origin = HeaderValue::from_str(&config.frontend_url)
        .map_err(|e| ServerError::Internal(format!("Invalid frontend URL {:?}: {}", config.frontend_url, e)))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let router = router.layer(DefaultBodyLimit::max(config.max_body_bytes));
    let router = with_security_headers(router)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router.with_state(state))
}
