//! Post listing, creation, upvotes and the comment views of a post.

use super::{parse_path_id, populate_comments};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::security::Validator;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use board_store::{
    CommentId, CommentQuery, CommentSort, CommentView, ListPostsOptions, NewPost, Post, PostId,
    PostSort, PostView, SortOrder, UpvoteOutcome, MAX_AUTHOR_CHARS, MAX_COMMENT_DEPTH,
    MAX_CONTENT_CHARS, MAX_TITLE_CHARS,
};
use board_thread::{build_thread, RenderedThread, ThreadOrder, ThreadView};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Comments returned with a post.
const POST_COMMENT_LIMIT: usize = 100;

/// Largest page `GET /api/posts` serves.
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsParams {
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<String>,
    pub skip: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSortParams {
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadParams {
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    /// Comma-separated ids whose hidden replies are revealed
    pub expand: Option<String>,
    /// Comma-separated ids collapsed by the reader
    pub collapse: Option<String>,
    /// Reader-selected top-level order, e.g. `newest`
    pub order: Option<String>,
    /// Show every top-level comment
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Serialize)]
pub struct PostList {
    pub posts: Vec<PostView>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct PostData {
    pub post: PostView,
}

#[derive(Debug, Serialize)]
pub struct PostWithComments {
    pub post: PostView,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Serialize)]
pub struct PostThread {
    pub post: PostView,
    pub thread: RenderedThread,
}

/// Parses an optional query value, recording a validation error on failure.
fn parse_param<T>(validator: &mut Validator, field: &str, raw: Option<&str>, default: T) -> T
where
    T: std::str::FromStr<Err = String>,
{
    match raw {
        None | Some("") => default,
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(message) => {
                validator.fail(field, &message);
                default
            }
        },
    }
}

fn parse_count(validator: &mut Validator, field: &str, raw: Option<&str>, default: usize) -> usize {
    match raw {
        None | Some("") => default,
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(value) => value,
            Err(_) => {
                validator.fail(field, &format!("{field} must be a non-negative integer"));
                default
            }
        },
    }
}

/// `limit=0` asks for no limit, which is capped like any other large page.
fn page_size(limit: usize) -> usize {
    match limit {
        0 => MAX_PAGE_SIZE,
        limit => limit.min(MAX_PAGE_SIZE),
    }
}

fn comment_query(
    validator: &mut Validator,
    sort_by: Option<&str>,
    sort_order: Option<&str>,
) -> CommentQuery {
    CommentQuery {
        sort_by: parse_param(validator, "sortBy", sort_by, CommentSort::Upvotes),
        sort_order: parse_param(validator, "sortOrder", sort_order, SortOrder::Desc),
        limit: POST_COMMENT_LIMIT,
        skip: 0,
        max_depth: MAX_COMMENT_DEPTH,
    }
}

async fn load_post(state: &AppState, raw_id: &str) -> Result<Post, ApiError> {
    let id: PostId = parse_path_id(raw_id, "Post")?;
    state
        .store
        .find_post(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))
}

fn id_set(raw: Option<&str>) -> HashSet<CommentId> {
    raw.unwrap_or_default()
        .split(',')
        .filter_map(|id| id.trim().parse().ok())
        .collect()
}

/// `GET /api/posts`
pub async fn list_posts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    params: Result<Query<ListPostsParams>, QueryRejection>,
) -> Result<ApiResponse<PostList>, ApiError> {
    let Query(params) = params?;

    let mut validator = Validator::new();
    let options = ListPostsOptions {
        sort_by: parse_param(&mut validator, "sortBy", params.sort_by.as_deref(), PostSort::CreatedAt),
        sort_order: parse_param(&mut validator, "sortOrder", params.sort_order.as_deref(), SortOrder::Desc),
        limit: page_size(parse_count(&mut validator, "limit", params.limit.as_deref(), 20)),
        skip: parse_count(&mut validator, "skip", params.skip.as_deref(), 0),
    };
    validator.finish()?;

    let posts: Vec<PostView> = state
        .store
        .list_posts(options)
        .await?
        .iter()
        .map(|post| post.view_for(user.id))
        .collect();

    Ok(ApiResponse::ok(
        "Posts retrieved successfully",
        PostList {
            count: posts.len(),
            posts,
        },
    ))
}

/// `POST /api/posts`
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<ApiResponse<PostData>, ApiError> {
    let Json(body) = payload?;

    let mut validator = Validator::new();
    let title = validator.text(
        "title",
        &body.title,
        1,
        MAX_TITLE_CHARS,
        "Title must be between 1 and 200 characters",
    );
    let content = validator.text(
        "content",
        &body.content,
        1,
        MAX_CONTENT_CHARS,
        "Content must be between 1 and 10000 characters",
    );
    let author = if body.author.trim().is_empty() {
        user.name.clone()
    } else {
        validator.text(
            "author",
            &body.author,
            1,
            MAX_AUTHOR_CHARS,
            "Author name cannot be more than 100 characters",
        )
    };
    validator.finish()?;

    let post = state
        .store
        .insert_post(NewPost {
            title,
            content,
            author,
        })
        .await?;

    info!("📝 {} created post {} \"{}\"", user.id, post.id, post.title);
    Ok(ApiResponse::created(
        "Post created successfully",
        PostData {
            post: post.view_for(user.id),
        },
    ))
}

/// `GET /api/posts/:id/comments`
pub async fn post_with_comments(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    params: Result<Query<CommentSortParams>, QueryRejection>,
) -> Result<ApiResponse<PostWithComments>, ApiError> {
    let Query(params) = params?;
    let post = load_post(&state, &id).await?;

    let mut validator = Validator::new();
    let query = comment_query(&mut validator, params.sort_by.as_deref(), params.sort_order.as_deref());
    validator.finish()?;

    let comments = state.store.comments_for_post(post.id, query).await?;
    let comments = populate_comments(state.store.as_ref(), &comments, user.id).await?;

    Ok(ApiResponse::ok(
        "Post retrieved successfully",
        PostWithComments {
            post: post.view_for(user.id),
            comments,
        },
    ))
}

/// `GET /api/posts/:id/thread`
///
/// The post's comments as the nested, partially revealed thread the reader
/// would see. The top level is ordered by `order` (most upvoted first by
/// default); replies keep the reader's own comments first.
pub async fn post_thread(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    params: Result<Query<ThreadParams>, QueryRejection>,
) -> Result<ApiResponse<PostThread>, ApiError> {
    let Query(params) = params?;
    let post = load_post(&state, &id).await?;

    let mut validator = Validator::new();
    let query = comment_query(&mut validator, params.sort_by.as_deref(), params.sort_order.as_deref());
    let order = match params.order.as_deref() {
        None | Some("") => ThreadOrder::default(),
        Some(raw) => raw.parse::<ThreadOrder>().unwrap_or_else(|message| {
            validator.fail("order", &message);
            ThreadOrder::default()
        }),
    };
    validator.finish()?;

    let comments = state.store.comments_for_post(post.id, query).await?;
    let comments = populate_comments(state.store.as_ref(), &comments, user.id).await?;
    let roots = build_thread(comments, Some(user.id));

    let view = ThreadView {
        order,
        show_all: params.all,
        expanded: id_set(params.expand.as_deref()),
        collapsed: id_set(params.collapse.as_deref()),
    };
    let thread = view.render(&roots, Utc::now());
    debug!(
        "Rendered thread for post {}: {} of {} top-level comments",
        post.id,
        thread.comments.len(),
        thread.total
    );

    Ok(ApiResponse::ok(
        "Thread retrieved successfully",
        PostThread {
            post: post.view_for(user.id),
            thread,
        },
    ))
}

/// `POST /api/posts/:id/upvote`
pub async fn upvote_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<UpvoteOutcome>, ApiError> {
    let id: PostId = parse_path_id(&id, "Post")?;
    let outcome = state.store.toggle_post_upvote(id, user.id).await?;

    let message = if outcome.has_upvoted {
        "Post upvoted successfully"
    } else {
        "Upvote removed"
    };
    Ok(ApiResponse::ok(message, outcome))
}
