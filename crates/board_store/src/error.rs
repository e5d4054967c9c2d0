//! Error types for store operations.

/// Enumeration of possible store errors.
///
/// Lookups that simply find nothing return `Ok(None)`; these variants cover
/// operations that cannot proceed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A referenced document does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A uniqueness constraint was violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A reply would nest deeper than the board allows
    #[error("Maximum nesting depth exceeded ({0} > {max})", max = crate::MAX_COMMENT_DEPTH)]
    DepthExceeded(u32),

    /// The parent comment cannot host the reply
    #[error("Invalid parent comment: {0}")]
    InvalidParent(String),

    /// Reading or writing a snapshot failed
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

impl StoreError {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
