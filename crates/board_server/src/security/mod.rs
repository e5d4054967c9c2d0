//! Security module for input validation, rate limiting, and protection mechanisms.

pub mod headers;
pub mod input_validation;
pub mod rate_limiter;

pub use headers::with_security_headers;
pub use input_validation::Validator;
pub use rate_limiter::{rate_limit, RateDecision, RateLimiter};

/// Security-related errors
#[derive(Debug, thiserror::Error)]
pub enum SecurityError {
    #[error("Malicious content detected")]
    MaliciousContent,
}
