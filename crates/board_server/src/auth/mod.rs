//! Authentication: access tokens, password hashes and the request extractor.

pub mod extractor;
pub mod password;
pub mod token;

pub use extractor::AuthUser;
pub use password::PasswordHasher;
pub use token::{Claims, TokenError, TokenIssuer};
