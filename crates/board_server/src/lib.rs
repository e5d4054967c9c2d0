//! # Board Server
//!
//! The REST API of the Parley discussion board, built on axum.
//!
//! ## Endpoints
//!
//! All routes live under `/api` and answer with a JSON envelope
//! `{ "success", "message", "data" }`:
//!
//! * `POST /api/auth/register`, `POST /api/auth/login`: create an account or
//!   sign in; both return the user and a bearer token
//! * `GET /api/auth/profile`, `POST /api/auth/logout`
//! * `GET /api/posts`, `POST /api/posts`
//! * `GET /api/posts/:id/comments`: the post with up to 100 of its comments
//! * `GET /api/posts/:id/thread`: the same comments as a nested thread with
//!   partial reveal applied
//! * `POST /api/posts/:id/upvote`, `POST /api/comments/:id/upvote`: toggles
//! * `POST /api/comments`: comment on a post or reply to a comment
//! * `GET /api/health`
//!
//! Everything except registration, login and health requires an
//! `Authorization: Bearer <token>` header.
//!
//! ## Middleware
//!
//! Requests pass through tracing, CORS for the configured frontend origin,
//! security headers, a body size limit and per-IP rate limiting before they
//! reach a handler.
//!
//! ## Error Handling
//!
//! [`ServerError`] covers failures of the server itself. Request failures are
//! [`ApiError`]s, which render as the error envelope with a matching status.

pub use config::{AuthConfig, SecurityConfig, ServerConfig};
pub use error::{ApiError, ServerError};
pub use response::{ApiResponse, FieldError};
pub use server::{build_router, BoardServer};
pub use shutdown::ShutdownState;
pub use state::AppState;
pub use utils::{create_server, create_server_with_config};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod security;
pub mod server;
pub mod shutdown;
pub mod state;
pub mod utils;
