use super::{parse_path_id, populate_comments};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::security::Validator;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use board_store::{CommentId, CommentView, NewComment, PostId, UpvoteOutcome, MAX_COMMENT_CHARS};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub post_id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentData {
    pub comment: CommentView,
}

/// `POST /api/comments`
pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<ApiResponse<CommentData>, ApiError> {
    let Json(body) = payload?;

    let mut validator = Validator::new();
    let text = validator.text(
        "text",
        &body.text,
        1,
        MAX_COMMENT_CHARS,
        "Comment must be between 1 and 2000 characters",
    );
    let post_id: Option<PostId> = validator.id("postId", &body.post_id, "Valid post ID is required");
    let parent_id: Option<CommentId> = match body.parent_id.as_deref() {
        None | Some("") => None,
        Some(raw) => validator.id("parentId", raw, "Valid parent comment ID is required"),
    };
    validator.finish()?;
    let Some(post_id) = post_id else {
        return Err(ApiError::BadRequest("Valid post ID is required".to_string()));
    };

    let comment = state
        .store
        .insert_comment(NewComment {
            text,
            post_id,
            user_id: user.id,
            parent_id,
        })
        .await?;

    info!(
        "💬 {} commented on post {} (comment {}, depth {})",
        user.id, comment.post_id, comment.id, comment.depth
    );

    let mut views = populate_comments(state.store.as_ref(), std::slice::from_ref(&comment), user.id).await?;
    let comment = views
        .pop()
        .ok_or_else(|| ApiError::internal("populated comment missing"))?;

    Ok(ApiResponse::created(
        "Comment created successfully",
        CommentData { comment },
    ))
}

/// `POST /api/comments/:id/upvote`
pub async fn upvote_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<UpvoteOutcome>, ApiError> {
    let id: CommentId = parse_path_id(&id, "Comment")?;
    let outcome = state.store.toggle_comment_upvote(id, user.id).await?;

    let message = if outcome.has_upvoted {
        "Comment upvoted successfully"
    } else {
        "Upvote removed"
    };
    Ok(ApiResponse::ok(message, outcome))
}
