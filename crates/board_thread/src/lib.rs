//! # Board Thread
//!
//! Turns the flat comment list of a post into the nested thread a reader sees.
//!
//! Three steps, each usable on its own:
//!
//! 1. [`build_thread`] links comments to their parents and orders siblings
//!    (the reader's own comments first, then most upvoted).
//! 2. [`ThreadView`] decides how much of the tree is revealed: ten top-level
//!    comments, ten replies under each, one reply below that, with "N more
//!    replies" markers for the rest. The top level is re-sorted by the
//!    reader's [`ThreadOrder`], most upvoted first unless they pick another.
//! 3. [`relative_age`] labels each comment with a short age such as `3h ago`.
//!
//! [`CommentFeed`] holds the flat list between requests and applies new
//! comments and upvote results to it.
//!
//! ```rust
//! use board_thread::{build_thread, ThreadView};
//!
//! let roots = build_thread(Vec::new(), None);
//! let thread = ThreadView::default().render(&roots, chrono::Utc::now());
//! assert_eq!(thread.total, 0);
//! ```

pub mod feed;
pub mod reveal;
pub mod time;
pub mod tree;

pub use feed::CommentFeed;
pub use reveal::{
    display_limit, RenderedComment, RenderedThread, ThreadOrder, ThreadView, COLLAPSE_DEPTH,
    TOP_LEVEL_LIMIT,
};
pub use time::relative_age;
pub use tree::{build_thread, ThreadNode};
