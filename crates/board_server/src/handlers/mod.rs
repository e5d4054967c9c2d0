//! Request handlers, one module per resource.

pub mod auth;
pub mod comments;
pub mod health;
pub mod posts;

use crate::error::ApiError;
use board_store::{BoardStore, Comment, CommentView, UserId, UserSummary};
use std::collections::HashMap;
use std::str::FromStr;

/// Fallback for paths no route matches.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// Parses a path id; anything that is not an id cannot name a document.
pub(crate) fn parse_path_id<T: FromStr>(raw: &str, kind: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("{kind} not found")))
}

/// Attaches author details to comments, as seen by `viewer`.
pub(crate) async fn populate_comments(
    store: &dyn BoardStore,
    comments: &[Comment],
    viewer: UserId,
) -> Result<Vec<CommentView>, ApiError> {
    let mut authors: HashMap<UserId, UserSummary> = HashMap::new();
    let mut views = Vec::with_capacity(comments.len());

    for comment in comments {
        let author = match authors.get(&comment.user_id) {
            Some(author) => author.clone(),
            None => {
                let author = store
                    .find_user(comment.user_id)
                    .await?
                    .map(|user| user.summary())
                    .unwrap_or_else(|| UserSummary::deleted(comment.user_id));
                authors.insert(comment.user_id, author.clone());
                author
            }
        };
        views.push(CommentView::new(comment, author, Some(viewer)));
    }

    Ok(views)
}
