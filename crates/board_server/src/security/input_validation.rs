//! Input validation and sanitization utilities.
//!
//! [`Validator`] collects every failing field of a request body so the client
//! gets them all in one `Validation failed` response.

use super::SecurityError;
use crate::error::ApiError;
use crate::response::FieldError;
use std::str::FromStr;

/// Validates string content for malicious patterns
pub fn validate_string_content(s: &str) -> Result<(), SecurityError> {
    // Check for null bytes
    if s.contains('\0') {
        return Err(SecurityError::MaliciousContent);
    }

    // Check for excessive control characters
    let control_char_count = s
        .chars()
        .filter(|c| c.is_control() && *c != '\n' && *c != '\r' && *c != '\t')
        .count();
    if control_char_count > 5 {
        return Err(SecurityError::MaliciousContent);
    }

    Ok(())
}

/// A deliberately loose address check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty()
                && !host.starts_with('.')
                && !host.ends_with('.')
                && tld.len() >= 2
                && tld.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        }
        None => false,
    }
}

/// Accumulates field errors for one request body.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Trims `value` and checks its length in characters.
    pub fn text(&mut self, field: &str, value: &str, min: usize, max: usize, message: &str) -> String {
        let value = value.trim();
        let len = value.chars().count();
        if len < min || len > max {
            self.fail(field, message);
        } else if validate_string_content(value).is_err() {
            self.fail(field, &format!("{field} contains invalid characters"));
        }
        value.to_string()
    }

    /// Checks an address and returns it normalized (trimmed, lower-cased).
    pub fn email(&mut self, field: &str, value: &str) -> String {
        let value = value.trim().to_lowercase();
        if !is_valid_email(&value) {
            self.fail(field, "Please provide a valid email");
        }
        value
    }

    pub fn min_len(&mut self, field: &str, value: &str, min: usize, message: &str) {
        if value.chars().count() < min {
            self.fail(field, message);
        }
    }

    pub fn required(&mut self, field: &str, value: &str, message: &str) {
        if value.is_empty() {
            self.fail(field, message);
        }
    }

    /// Parses a document id, recording `message` if it is not one.
    pub fn id<T: FromStr>(&mut self, field: &str, value: &str, message: &str) -> Option<T> {
        match value.trim().parse() {
            Ok(id) => Some(id),
            Err(_) => {
                self.fail(field, message);
                None
            }
        }
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_store::PostId;

    #[test]
    fn test_string_content() {
        assert!(validate_string_content("hello\nworld\t!").is_ok());
        assert!(validate_string_content("nul\0byte").is_err());
        assert!(validate_string_content("\u{1}\u{2}\u{3}\u{4}\u{5}\u{6}").is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("alex.chen@example.com"));
        assert!(is_valid_email("a+tag@sub.example.io"));
        assert!(!is_valid_email("alex.chen"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("alex@example"));
        assert!(!is_valid_email("alex@example.c"));
        assert!(!is_valid_email("alex @example.com"));
        assert!(!is_valid_email("a@b@example.com"));
    }

    #[test]
    fn test_validator_collects_all_errors() {
        let mut validator = Validator::new();
        let name = validator.text("name", "  A  ", 2, 50, "Name must be between 2 and 50 characters");
        let email = validator.email("email", " Alex.Chen@Example.COM ");
        validator.min_len("password", "12345", 6, "Password must be at least 6 characters long");

        assert_eq!(name, "A");
        assert_eq!(email, "alex.chen@example.com");

        let Err(ApiError::Validation(errors)) = validator.finish() else {
            panic!("expected validation errors");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "password"]);
    }

    #[test]
    fn test_validator_parses_ids() {
        let mut validator = Validator::new();
        let id = PostId::new();

        let parsed: Option<PostId> = validator.id("postId", &id.to_string(), "Valid post ID is required");
        assert_eq!(parsed, Some(id));
        let bad: Option<PostId> = validator.id("parentId", "not-an-id", "Valid parent comment ID is required");
        assert!(bad.is_none());
        assert!(validator.finish().is_err());
    }
}
