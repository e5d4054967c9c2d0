//! Partial reveal of a comment tree.
//!
//! Deep threads are shown a little at a time. Each level has a display limit
//! and the replies beyond it are summarised by a "N more replies" marker until
//! the reader asks to see them. From [`COLLAPSE_DEPTH`] down, a comment with
//! replies can be collapsed to hide them entirely.

use crate::time::relative_age;
use crate::tree::ThreadNode;
use board_store::{CommentId, CommentView};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Top-level comments shown before "View N more comments".
pub const TOP_LEVEL_LIMIT: usize = 10;

/// Shallowest depth at which a comment with replies may be collapsed.
pub const COLLAPSE_DEPTH: usize = 6;

/// Replies shown under a comment at `depth` before the rest are hidden.
pub fn display_limit(depth: usize) -> usize {
    match depth {
        0 => 10,
        1 => 1,
        _ => 0,
    }
}

/// Reader-selected ordering of the top-level comments.
///
/// The sort is stable, so the tree's sibling order (the reader's own
/// comments first) breaks ties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadOrder {
    #[default]
    MostUpvoted,
    LeastUpvoted,
    Newest,
    Oldest,
}

impl FromStr for ThreadOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "most_upvoted" => Ok(Self::MostUpvoted),
            "least_upvoted" => Ok(Self::LeastUpvoted),
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            other => Err(format!("Invalid thread order: {other}")),
        }
    }
}

/// What the reader has revealed or hidden in one thread.
#[derive(Debug, Clone, Default)]
pub struct ThreadView {
    pub order: ThreadOrder,
    /// Show every top-level comment instead of the first [`TOP_LEVEL_LIMIT`].
    pub show_all: bool,
    /// Comments whose hidden replies have been revealed.
    pub expanded: HashSet<CommentId>,
    /// Collapsed comments. Only honoured where collapsing is offered.
    pub collapsed: HashSet<CommentId>,
}

/// A comment as displayed, with the replies that are visible under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedComment {
    #[serde(flatten)]
    pub comment: CommentView,
    pub age: String,
    pub collapsible: bool,
    pub collapsed: bool,
    pub replies: Vec<RenderedComment>,
    /// Direct replies not rendered under this comment.
    pub hidden_replies: usize,
    /// Marker text for the hidden replies, e.g. `3 more replies`.
    pub more_replies: Option<String>,
}

/// The visible part of a whole thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedThread {
    /// Number of top-level comments.
    pub total: usize,
    pub comments: Vec<RenderedComment>,
    pub hidden_comments: usize,
    pub more_comments: Option<String>,
}

impl ThreadView {
    pub fn expand(&mut self, id: CommentId) {
        self.expanded.insert(id);
    }

    /// Flips the collapsed state of a comment.
    pub fn toggle_collapsed(&mut self, id: CommentId) {
        if !self.collapsed.remove(&id) {
            self.collapsed.insert(id);
        }
    }

    /// Renders `roots` as they would be shown at `now`.
    pub fn render(&self, roots: &[ThreadNode], now: DateTime<Utc>) -> RenderedThread {
        let mut ordered: Vec<&ThreadNode> = roots.iter().collect();
        ordered.sort_by(|a, b| {
            let (a, b) = (&a.comment, &b.comment);
            match self.order {
                ThreadOrder::MostUpvoted => b.upvotes.cmp(&a.upvotes),
                ThreadOrder::LeastUpvoted => a.upvotes.cmp(&b.upvotes),
                ThreadOrder::Newest => b.created_at.cmp(&a.created_at),
                ThreadOrder::Oldest => a.created_at.cmp(&b.created_at),
            }
        });

        let total = ordered.len();
        let shown = if self.show_all {
            total
        } else {
            total.min(TOP_LEVEL_LIMIT)
        };
        let hidden = total - shown;

        RenderedThread {
            total,
            comments: ordered
                .into_iter()
                .take(shown)
                .map(|node| self.render_node(node, 0, now))
                .collect(),
            hidden_comments: hidden,
            more_comments: (hidden > 0).then(|| format!("View {}", more_label(hidden, "comment", "comments"))),
        }
    }

    fn render_node(&self, node: &ThreadNode, depth: usize, now: DateTime<Utc>) -> RenderedComment {
        let id = node.id();
        let collapsible = depth >= COLLAPSE_DEPTH && !node.replies.is_empty();
        let collapsed = collapsible && self.collapsed.contains(&id);

        let shown = if collapsed {
            0
        } else if self.expanded.contains(&id) {
            node.replies.len()
        } else {
            node.replies.len().min(display_limit(depth))
        };
        let hidden = node.replies.len() - shown;

        RenderedComment {
            comment: node.comment.clone(),
            age: relative_age(node.comment.created_at, now),
            collapsible,
            collapsed,
            replies: node.replies[..shown]
                .iter()
                .map(|reply| self.render_node(reply, depth + 1, now))
                .collect(),
            hidden_replies: hidden,
            // A collapsed comment offers "Expand" rather than a count.
            more_replies: (hidden > 0 && !collapsed).then(|| more_label(hidden, "reply", "replies")),
        }
    }
}

fn more_label(count: usize, one: &str, many: &str) -> String {
    format!("{count} more {}", if count == 1 { one } else { many })
}
