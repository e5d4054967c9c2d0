use super::user::UserSummary;
use crate::types::{CommentId, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_COMMENT_CHARS: usize = 2000;

/// Deepest nesting level a reply may sit at. Top-level comments are depth 0.
pub const MAX_COMMENT_DEPTH: u32 = 10;

/// A stored comment document.
///
/// `reply_count` counts direct replies only and is maintained by the store
/// when a reply is inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: CommentId,
    pub text: String,
    pub post_id: PostId,
    pub user_id: UserId,
    pub parent_id: Option<CommentId>,
    pub upvotes: u64,
    pub downvotes: u64,
    pub reply_count: u64,
    pub depth: u32,
    pub is_active: bool,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub upvoted_by: Vec<UserId>,
    #[serde(default)]
    pub downvoted_by: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub post_id: PostId,
    pub user_id: UserId,
    pub parent_id: Option<CommentId>,
}

impl Comment {
    pub fn net_score(&self) -> i64 {
        self.upvotes as i64 - self.downvotes as i64
    }

    /// Materialized path: `"<parent>/<id>"` for replies, `"<id>"` for roots.
    pub fn path(&self) -> String {
        match self.parent_id {
            Some(parent) => format!("{parent}/{}", self.id),
            None => self.id.to_string(),
        }
    }

    pub fn has_upvoted(&self, user: UserId) -> bool {
        self.upvoted_by.contains(&user)
    }
}

/// A comment with its author populated, as seen by one viewer.
///
/// This is the shape the client receives and the shape the thread builder
/// works on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(rename = "_id")]
    pub id: CommentId,
    pub text: String,
    pub post_id: PostId,
    #[serde(rename = "userId")]
    pub author: UserSummary,
    pub parent_id: Option<CommentId>,
    pub upvotes: u64,
    pub downvotes: u64,
    pub net_score: i64,
    pub reply_count: u64,
    pub depth: u32,
    pub path: String,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub has_upvoted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentView {
    pub fn new(comment: &Comment, author: UserSummary, viewer: Option<UserId>) -> Self {
        Self {
            id: comment.id,
            text: comment.text.clone(),
            post_id: comment.post_id,
            author,
            parent_id: comment.parent_id,
            upvotes: comment.upvotes,
            downvotes: comment.downvotes,
            net_score: comment.net_score(),
            reply_count: comment.reply_count,
            depth: comment.depth,
            path: comment.path(),
            is_edited: comment.is_edited,
            edited_at: comment.edited_at,
            has_upvoted: viewer.map(|user| comment.has_upvoted(user)).unwrap_or(false),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(parent: Option<CommentId>) -> Comment {
        let now = Utc::now();
        Comment {
            id: CommentId::new(),
            text: "hello".to_string(),
            post_id: PostId::new(),
            user_id: UserId::new(),
            parent_id: parent,
            upvotes: 3,
            downvotes: 5,
            reply_count: 0,
            depth: 0,
            is_active: true,
            is_edited: false,
            edited_at: None,
            upvoted_by: Vec::new(),
            downvoted_by: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_net_score_can_go_negative() {
        assert_eq!(sample(None).net_score(), -2);
    }

    #[test]
    fn test_path_includes_parent() {
        let root = sample(None);
        assert_eq!(root.path(), root.id.to_string());

        let reply = sample(Some(root.id));
        assert_eq!(reply.path(), format!("{}/{}", root.id, reply.id));
    }

    #[test]
    fn test_view_serializes_author_under_user_id() {
        let mut comment = sample(None);
        let viewer = UserId::new();
        comment.upvoted_by.push(viewer);

        let author = UserSummary {
            id: comment.user_id,
            name: "Sarah Wilson".to_string(),
            avatar: "https://i.pravatar.cc/150?img=3".to_string(),
        };
        let view = CommentView::new(&comment, author, Some(viewer));
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["userId"]["name"], "Sarah Wilson");
        assert_eq!(json["hasUpvoted"], true);
        assert_eq!(json["_id"], comment.id.to_string());
        assert!(json["parentId"].is_null());
    }
}
