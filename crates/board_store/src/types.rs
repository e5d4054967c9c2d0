//! # Core Type Definitions
//!
//! Identifier newtypes shared by every document in the board. Each id wraps a
//! UUID so a `PostId` can never be handed to something expecting a
//! `CommentId`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! document_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random id using UUID v4.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

document_id! {
    /// Unique identifier for a registered user.
    ///
    /// ```rust
    /// use board_store::UserId;
    ///
    /// let id: UserId = "550e8400-e29b-41d4-a716-446655440000".parse()?;
    /// assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    UserId
}

document_id! {
    /// Unique identifier for a post.
    PostId
}

document_id! {
    /// Unique identifier for a comment.
    CommentId
}

/// Result of toggling an upvote on a post or comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpvoteOutcome {
    /// Upvote count after the toggle
    pub upvotes: u64,
    /// Whether the caller's upvote is now present
    pub has_upvoted: bool,
}

/// Toggles `user` in `voters`, keeping `count` in step.
///
/// Removing an existing vote decrements the count (never below zero); adding a
/// new vote increments it.
pub(crate) fn toggle_vote(voters: &mut Vec<UserId>, count: &mut u64, user: UserId) -> UpvoteOutcome {
    let had_voted = voters.contains(&user);
    if had_voted {
        voters.retain(|voter| *voter != user);
        *count = count.saturating_sub(1);
    } else {
        voters.push(user);
        *count += 1;
    }

    UpvoteOutcome {
        upvotes: *count,
        has_upvoted: !had_voted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trips_through_string() {
        let id = PostId::new();
        let parsed: PostId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_id_rejects_garbage() {
        assert!("not-an-id".parse::<CommentId>().is_err());
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = UserId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }

    #[test]
    fn test_toggle_vote_adds_then_removes() {
        let user = UserId::new();
        let mut voters = Vec::new();
        let mut count = 0;

        let first = toggle_vote(&mut voters, &mut count, user);
        assert_eq!(first, UpvoteOutcome { upvotes: 1, has_upvoted: true });
        assert_eq!(voters, vec![user]);

        let second = toggle_vote(&mut voters, &mut count, user);
        assert_eq!(second, UpvoteOutcome { upvotes: 0, has_upvoted: false });
        assert!(voters.is_empty());
    }

    #[test]
    fn test_toggle_vote_floors_at_zero() {
        let user = UserId::new();
        let mut voters = vec![user];
        let mut count = 0;

        let outcome = toggle_vote(&mut voters, &mut count, user);
        assert_eq!(outcome.upvotes, 0);
        assert!(!outcome.has_upvoted);
    }
}
