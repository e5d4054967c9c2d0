//! # Board Store
//!
//! Documents and storage for the Parley discussion board.
//!
//! The board keeps three collections: users, posts and comments. Comments form
//! a tree through `parent_id`; the store is responsible for the bookkeeping
//! that keeps that tree consistent:
//!
//! * a reply's `depth` is its parent's depth plus one, capped at
//!   [`MAX_COMMENT_DEPTH`]
//! * inserting a reply increments the parent's `reply_count`
//! * inserting any comment increments the post's `comment_count`
//! * upvotes toggle per user and the count never drops below zero
//!
//! Access goes through the [`BoardStore`] trait. [`MemoryStore`] keeps the
//! collections in memory and persists them as JSON [`Snapshot`]s.

pub mod error;
pub mod models;
pub mod query;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use models::*;
pub use query::{CommentQuery, CommentSort, ListPostsOptions, PostSort, SortOrder};
pub use store::{BoardStore, MemoryStore, Snapshot, StoreStats};
pub use types::{CommentId, PostId, UpvoteOutcome, UserId};

#[cfg(test)]
mod tests;
