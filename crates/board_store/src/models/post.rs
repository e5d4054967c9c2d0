use crate::types::{PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_CONTENT_CHARS: usize = 10_000;
pub const MAX_AUTHOR_CHARS: usize = 100;

/// A stored post document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author: String,
    pub upvotes: u64,
    pub comment_count: u64,
    #[serde(default)]
    pub upvoted_by: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: String,
}

/// A post as returned to a particular viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(rename = "_id")]
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author: String,
    pub upvotes: u64,
    pub net_score: u64,
    pub comment_count: u64,
    pub has_upvoted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn has_upvoted(&self, user: UserId) -> bool {
        self.upvoted_by.contains(&user)
    }

    pub fn view_for(&self, viewer: UserId) -> PostView {
        PostView {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            author: self.author.clone(),
            upvotes: self.upvotes,
            net_score: self.upvotes,
            comment_count: self.comment_count,
            has_upvoted: self.has_upvoted(viewer),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
