//! Sorting and pagination options for list queries.

use crate::models::{Comment, Post, MAX_COMMENT_DEPTH};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("Invalid sort order: {other}. Must be one of: asc, desc")),
        }
    }
}

/// Field a post listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PostSort {
    #[default]
    CreatedAt,
    Upvotes,
    CommentCount,
    Title,
}

impl PostSort {
    fn compare(self, a: &Post, b: &Post) -> Ordering {
        match self {
            PostSort::CreatedAt => a.created_at.cmp(&b.created_at),
            PostSort::Upvotes => a.upvotes.cmp(&b.upvotes),
            PostSort::CommentCount => a.comment_count.cmp(&b.comment_count),
            PostSort::Title => a.title.cmp(&b.title),
        }
    }
}

impl FromStr for PostSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(PostSort::CreatedAt),
            "upvotes" => Ok(PostSort::Upvotes),
            "commentCount" => Ok(PostSort::CommentCount),
            "title" => Ok(PostSort::Title),
            other => Err(format!(
                "Invalid sort field: {other}. Must be one of: createdAt, upvotes, commentCount, title"
            )),
        }
    }
}

/// Field a comment listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum CommentSort {
    #[default]
    Upvotes,
    CreatedAt,
    ReplyCount,
}

impl CommentSort {
    fn compare(self, a: &Comment, b: &Comment) -> Ordering {
        match self {
            CommentSort::Upvotes => a.upvotes.cmp(&b.upvotes),
            CommentSort::CreatedAt => a.created_at.cmp(&b.created_at),
            CommentSort::ReplyCount => a.reply_count.cmp(&b.reply_count),
        }
    }
}

impl FromStr for CommentSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvotes" => Ok(CommentSort::Upvotes),
            "createdAt" => Ok(CommentSort::CreatedAt),
            "replyCount" => Ok(CommentSort::ReplyCount),
            other => Err(format!(
                "Invalid sort field: {other}. Must be one of: upvotes, createdAt, replyCount"
            )),
        }
    }
}

/// Options for listing posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPostsOptions {
    pub sort_by: PostSort,
    pub sort_order: SortOrder,
    pub limit: usize,
    pub skip: usize,
}

impl Default for ListPostsOptions {
    fn default() -> Self {
        Self {
            sort_by: PostSort::CreatedAt,
            sort_order: SortOrder::Desc,
            limit: 20,
            skip: 0,
        }
    }
}

/// Options for fetching the comments of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentQuery {
    pub sort_by: CommentSort,
    pub sort_order: SortOrder,
    pub limit: usize,
    pub skip: usize,
    pub max_depth: u32,
}

impl Default for CommentQuery {
    fn default() -> Self {
        Self {
            sort_by: CommentSort::Upvotes,
            sort_order: SortOrder::Desc,
            limit: 50,
            skip: 0,
            max_depth: MAX_COMMENT_DEPTH,
        }
    }
}

/// Sorts, skips and limits posts in place of a database cursor.
///
/// Ties fall back to creation time and then id so pages are stable.
pub(crate) fn page_posts(mut posts: Vec<Post>, options: &ListPostsOptions) -> Vec<Post> {
    posts.sort_by(|a, b| {
        options
            .sort_order
            .apply(options.sort_by.compare(a, b))
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    posts.into_iter().skip(options.skip).take(options.limit).collect()
}

pub(crate) fn page_comments(mut comments: Vec<Comment>, query: &CommentQuery) -> Vec<Comment> {
    comments.retain(|comment| comment.is_active && comment.depth <= query.max_depth);
    comments.sort_by(|a, b| {
        query
            .sort_order
            .apply(query.sort_by.compare(a, b))
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    comments.into_iter().skip(query.skip).take(query.limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_fields() {
        assert_eq!("createdAt".parse::<PostSort>().unwrap(), PostSort::CreatedAt);
        assert_eq!("commentCount".parse::<PostSort>().unwrap(), PostSort::CommentCount);
        assert_eq!("replyCount".parse::<CommentSort>().unwrap(), CommentSort::ReplyCount);
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
    }

    #[test]
    fn test_parse_rejects_unknown_fields() {
        let err = "password".parse::<PostSort>().unwrap_err();
        assert!(err.contains("Invalid sort field"));
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_defaults_match_listing_behaviour() {
        let posts = ListPostsOptions::default();
        assert_eq!(posts.sort_by, PostSort::CreatedAt);
        assert_eq!(posts.sort_order, SortOrder::Desc);
        assert_eq!(posts.limit, 20);

        let comments = CommentQuery::default();
        assert_eq!(comments.sort_by, CommentSort::Upvotes);
        assert_eq!(comments.limit, 50);
        assert_eq!(comments.max_depth, 10);
    }
}
