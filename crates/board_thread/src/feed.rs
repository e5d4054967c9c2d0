use crate::tree::{build_thread, ThreadNode};
use board_store::{CommentId, CommentView, UpvoteOutcome, UserId};
use std::collections::HashSet;
use tracing::debug;

/// Flat comment list for one post, kept between requests.
///
/// New comments and upvote results are applied in place; [`Self::nested`]
/// rebuilds the tree whenever it is needed.
#[derive(Debug, Clone, Default)]
pub struct CommentFeed {
    comments: Vec<CommentView>,
    upvoted: HashSet<CommentId>,
}

impl CommentFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole list, e.g. after fetching a post's comments.
    pub fn replace(&mut self, comments: Vec<CommentView>) {
        self.upvoted = comments
            .iter()
            .filter(|comment| comment.has_upvoted)
            .map(|comment| comment.id)
            .collect();
        self.comments = comments;
    }

    /// Appends a comment the reader just created.
    pub fn push(&mut self, comment: CommentView) {
        if comment.has_upvoted {
            self.upvoted.insert(comment.id);
        }
        self.comments.push(comment);
    }

    /// Applies the result of an upvote toggle. Returns `false` if the comment
    /// is not in the feed.
    pub fn apply_upvote(&mut self, id: CommentId, outcome: UpvoteOutcome) -> bool {
        let Some(comment) = self.comments.iter_mut().find(|comment| comment.id == id) else {
            debug!("Upvote result for unknown comment {id}");
            return false;
        };

        comment.upvotes = outcome.upvotes;
        comment.net_score = outcome.upvotes as i64 - comment.downvotes as i64;
        comment.has_upvoted = outcome.has_upvoted;
        if outcome.has_upvoted {
            self.upvoted.insert(id);
        } else {
            self.upvoted.remove(&id);
        }
        true
    }

    pub fn is_upvoted(&self, id: CommentId) -> bool {
        self.upvoted.contains(&id)
    }

    pub fn comments(&self) -> &[CommentView] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// The feed as an ordered tree for `viewer`.
    pub fn nested(&self, viewer: Option<UserId>) -> Vec<ThreadNode> {
        build_thread(self.comments.clone(), viewer)
    }
}
