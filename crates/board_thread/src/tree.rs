//! Assembly of a flat comment list into an ordered tree.

use board_store::{CommentId, CommentView, UserId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::trace;

/// A comment together with its direct replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadNode {
    #[serde(flatten)]
    pub comment: CommentView,
    pub replies: Vec<ThreadNode>,
}

impl ThreadNode {
    pub fn id(&self) -> CommentId {
        self.comment.id
    }

    /// Number of comments below this node, at any depth.
    pub fn descendant_count(&self) -> usize {
        self.replies
            .iter()
            .map(|reply| 1 + reply.descendant_count())
            .sum()
    }
}

/// Builds the comment tree for `viewer`.
///
/// Top-level comments become roots and replies hang off their parent. A reply
/// whose parent is not in `comments` is dropped, together with anything under
/// it. Siblings are ordered with the viewer's own comments first, then by
/// upvotes, highest first; the sort is stable so ties keep input order.
pub fn build_thread(comments: Vec<CommentView>, viewer: Option<UserId>) -> Vec<ThreadNode> {
    let mut roots = Vec::new();
    let mut children: HashMap<CommentId, Vec<CommentView>> = HashMap::new();

    for comment in comments {
        match comment.parent_id {
            None => roots.push(comment),
            Some(parent) => children.entry(parent).or_default().push(comment),
        }
    }

    let mut thread = attach(roots, &mut children);
    if !children.is_empty() {
        trace!(
            "Dropped {} orphaned reply groups while building thread",
            children.len()
        );
    }
    sort_siblings(&mut thread, viewer);
    thread
}

fn attach(
    level: Vec<CommentView>,
    children: &mut HashMap<CommentId, Vec<CommentView>>,
) -> Vec<ThreadNode> {
    level
        .into_iter()
        .map(|comment| {
            let replies = children.remove(&comment.id).unwrap_or_default();
            ThreadNode {
                replies: attach(replies, children),
                comment,
            }
        })
        .collect()
}

fn sort_siblings(nodes: &mut [ThreadNode], viewer: Option<UserId>) {
    nodes.sort_by(|a, b| sibling_order(&a.comment, &b.comment, viewer));
    for node in nodes.iter_mut() {
        sort_siblings(&mut node.replies, viewer);
    }
}

fn sibling_order(a: &CommentView, b: &CommentView, viewer: Option<UserId>) -> Ordering {
    let own = |comment: &CommentView| viewer.is_some_and(|user| comment.author.id == user);
    own(b)
        .cmp(&own(a))
        .then_with(|| b.upvotes.cmp(&a.upvotes))
}
