//! The document-store seam.
//!
//! Handlers talk to a [`BoardStore`] trait object so the backing database can
//! be swapped without touching the HTTP layer. [`MemoryStore`] is the bundled
//! implementation.

use crate::error::StoreError;
use crate::models::{Comment, NewComment, NewPost, NewUser, Post, User};
use crate::query::{CommentQuery, ListPostsOptions};
use crate::types::{CommentId, PostId, UpvoteOutcome, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod memory;
mod snapshot;

pub use memory::MemoryStore;
pub use snapshot::Snapshot;

/// Document counts, used for startup and shutdown reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub users: usize,
    pub posts: usize,
    pub comments: usize,
}

/// Storage operations the board needs.
///
/// Every mutation is a single-document read-modify-write; there are no
/// multi-document transactions and concurrent writers resolve last-write-wins.
#[async_trait]
pub trait BoardStore: Send + Sync + 'static {
    /// Registers a user. Emails are unique, compared case-insensitively.
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn insert_post(&self, post: NewPost) -> Result<Post, StoreError>;

    async fn find_post(&self, id: PostId) -> Result<Option<Post>, StoreError>;

    async fn list_posts(&self, options: ListPostsOptions) -> Result<Vec<Post>, StoreError>;

    /// Adds the user's upvote, or removes it if already present.
    async fn toggle_post_upvote(&self, id: PostId, user: UserId) -> Result<UpvoteOutcome, StoreError>;

    /// Inserts a comment or reply.
    ///
    /// Replies take their depth from the parent and bump the parent's reply
    /// count; the post's comment count is bumped for every insert.
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, StoreError>;

    async fn find_comment(&self, id: CommentId) -> Result<Option<Comment>, StoreError>;

    /// Active comments of a post, filtered by depth, sorted and paged.
    async fn comments_for_post(&self, post: PostId, query: CommentQuery) -> Result<Vec<Comment>, StoreError>;

    async fn toggle_comment_upvote(&self, id: CommentId, user: UserId) -> Result<UpvoteOutcome, StoreError>;

    /// Recomputes a post's comment count from the stored comments.
    async fn recount_comments(&self, post: PostId) -> Result<Post, StoreError>;

    async fn stats(&self) -> StoreStats;
}
