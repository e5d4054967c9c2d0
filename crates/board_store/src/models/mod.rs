//! Board documents: users, posts and comments.

pub mod comment;
pub mod post;
pub mod user;

pub use comment::{Comment, CommentView, NewComment, MAX_COMMENT_CHARS, MAX_COMMENT_DEPTH};
pub use post::{NewPost, Post, PostView, MAX_AUTHOR_CHARS, MAX_CONTENT_CHARS, MAX_TITLE_CHARS};
pub use user::{NewUser, PublicUser, Role, User, UserSummary};
