//! In-memory document store backed by `DashMap` collections.

use super::{BoardStore, Snapshot, StoreStats};
use crate::error::StoreError;
use crate::models::{Comment, NewComment, NewPost, NewUser, Post, User, MAX_COMMENT_DEPTH};
use crate::query::{page_comments, page_posts, CommentQuery, ListPostsOptions};
use crate::types::{toggle_vote, CommentId, PostId, UpvoteOutcome, UserId};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::path::Path;
use tracing::{debug, info};

/// A document store that keeps every collection in memory.
///
/// Each document lives in its own map entry, so a mutation locks only the
/// shard holding that document. Persistence is by whole-store [`Snapshot`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<UserId, User>,
    /// Normalized email -> owner, enforcing uniqueness
    emails: DashMap<String, UserId>,
    posts: DashMap<PostId, Post>,
    comments: DashMap<CommentId, Comment>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a previously written snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let store = Self::new();
        for user in snapshot.users {
            store.emails.insert(normalize_email(&user.email), user.id);
            store.users.insert(user.id, user);
        }
        for post in snapshot.posts {
            store.posts.insert(post.id, post);
        }
        for comment in snapshot.comments {
            store.comments.insert(comment.id, comment);
        }
        store
    }

    /// Loads the snapshot at `path`, or starts empty if there is none yet.
    pub async fn load_snapshot(path: &Path) -> Result<Self, StoreError> {
        match Snapshot::read(path).await? {
            Some(snapshot) => {
                let store = Self::from_snapshot(snapshot);
                let stats = store.stats().await;
                info!(
                    "📂 Loaded snapshot {} ({} users, {} posts, {} comments)",
                    path.display(),
                    stats.users,
                    stats.posts,
                    stats.comments
                );
                Ok(store)
            }
            None => {
                info!("📂 No snapshot at {}, starting with an empty store", path.display());
                Ok(Self::new())
            }
        }
    }

    /// Copies every collection into a [`Snapshot`].
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            users: self.users.iter().map(|entry| entry.value().clone()).collect(),
            posts: self.posts.iter().map(|entry| entry.value().clone()).collect(),
            comments: self.comments.iter().map(|entry| entry.value().clone()).collect(),
        }
    }

    pub async fn save_snapshot(&self, path: &Path) -> Result<(), StoreError> {
        let snapshot = self.snapshot();
        snapshot.write(path).await?;
        info!(
            "💾 Saved snapshot {} ({} users, {} posts, {} comments)",
            path.display(),
            snapshot.users.len(),
            snapshot.posts.len(),
            snapshot.comments.len()
        );
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.posts.is_empty() && self.comments.is_empty()
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn insert_user(&self, new: NewUser) -> Result<User, StoreError> {
        let email = normalize_email(&new.email);
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            name: new.name,
            email: email.clone(),
            password_hash: new.password_hash,
            avatar: new.avatar,
            role: new.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        match self.emails.entry(email) {
            Entry::Occupied(_) => {
                return Err(StoreError::Conflict(
                    "User already exists with this email".to_string(),
                ))
            }
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }

        self.users.insert(user.id, user.clone());
        debug!("Inserted user {} <{}>", user.id, user.email);
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(&id).map(|user| user.clone()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let id = match self.emails.get(&normalize_email(email)) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.users.get(&id).map(|user| user.clone()))
    }

    async fn insert_post(&self, new: NewPost) -> Result<Post, StoreError> {
        let now = Utc::now();
        let post = Post {
            id: PostId::new(),
            title: new.title,
            content: new.content,
            author: new.author,
            upvotes: 0,
            comment_count: 0,
            upvoted_by: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.posts.insert(post.id, post.clone());
        debug!("Inserted post {} \"{}\"", post.id, post.title);
        Ok(post)
    }

    async fn find_post(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.get(&id).map(|post| post.clone()))
    }

    async fn list_posts(&self, options: ListPostsOptions) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.iter().map(|entry| entry.value().clone()).collect();
        Ok(page_posts(posts, &options))
    }

    async fn toggle_post_upvote(&self, id: PostId, user: UserId) -> Result<UpvoteOutcome, StoreError> {
        let mut post = self
            .posts
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Post", id))?;
        let post = post.value_mut();
        let outcome = toggle_vote(&mut post.upvoted_by, &mut post.upvotes, user);
        post.updated_at = Utc::now();
        Ok(outcome)
    }

    async fn insert_comment(&self, new: NewComment) -> Result<Comment, StoreError> {
        if !self.posts.contains_key(&new.post_id) {
            return Err(StoreError::not_found("Post", new.post_id));
        }

        let depth = match new.parent_id {
            Some(parent_id) => {
                // Copy what we need so the parent's shard is unlocked before
                // the reply is inserted.
                let (parent_post, parent_depth) = {
                    let parent = self
                        .comments
                        .get(&parent_id)
                        .ok_or_else(|| StoreError::not_found("Parent comment", parent_id))?;
                    (parent.post_id, parent.depth)
                };
                if parent_post != new.post_id {
                    return Err(StoreError::InvalidParent(format!(
                        "comment {parent_id} belongs to a different post"
                    )));
                }
                let depth = parent_depth + 1;
                if depth > MAX_COMMENT_DEPTH {
                    return Err(StoreError::DepthExceeded(depth));
                }
                depth
            }
            None => 0,
        };

        let now = Utc::now();
        let comment = Comment {
            id: CommentId::new(),
            text: new.text,
            post_id: new.post_id,
            user_id: new.user_id,
            parent_id: new.parent_id,
            upvotes: 0,
            downvotes: 0,
            reply_count: 0,
            depth,
            is_active: true,
            is_edited: false,
            edited_at: None,
            upvoted_by: Vec::new(),
            downvoted_by: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.comments.insert(comment.id, comment.clone());

        if let Some(parent_id) = comment.parent_id {
            if let Some(mut parent) = self.comments.get_mut(&parent_id) {
                parent.reply_count += 1;
            }
        }
        if let Some(mut post) = self.posts.get_mut(&comment.post_id) {
            post.comment_count += 1;
        }

        debug!(
            "Inserted comment {} on post {} at depth {}",
            comment.id, comment.post_id, comment.depth
        );
        Ok(comment)
    }

    async fn find_comment(&self, id: CommentId) -> Result<Option<Comment>, StoreError> {
        Ok(self.comments.get(&id).map(|comment| comment.clone()))
    }

    async fn comments_for_post(&self, post: PostId, query: CommentQuery) -> Result<Vec<Comment>, StoreError> {
        let comments = self
            .comments
            .iter()
            .filter(|entry| entry.post_id == post)
            .map(|entry| entry.value().clone())
            .collect();
        Ok(page_comments(comments, &query))
    }

    async fn toggle_comment_upvote(&self, id: CommentId, user: UserId) -> Result<UpvoteOutcome, StoreError> {
        let mut comment = self
            .comments
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Comment", id))?;
        let comment = comment.value_mut();
        let outcome = toggle_vote(&mut comment.upvoted_by, &mut comment.upvotes, user);
        comment.updated_at = Utc::now();
        Ok(outcome)
    }

    async fn recount_comments(&self, id: PostId) -> Result<Post, StoreError> {
        let count = self
            .comments
            .iter()
            .filter(|entry| entry.post_id == id)
            .count() as u64;

        let mut post = self
            .posts
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Post", id))?;
        post.comment_count = count;
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn stats(&self) -> StoreStats {
        StoreStats {
            users: self.users.len(),
            posts: self.posts.len(),
            comments: self.comments.len(),
        }
    }
}
