use super::json_single;
use crate::models::CommentInput;
use crate::web::error::AppResult;
use crate::web::state::AppState;
use crate::BlogError;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use std::sync::Arc;

fn require_content(input: &CommentInput) -> Result<&str, BlogError> {
    let content = input.content.trim();
    if content.is_empty() {
        return Err(BlogError::InvalidInput("Comment must not be empty".into()));
    }
    Ok(content)
}

/// POST /posts/:id/comments
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
    Json(input): Json<CommentInput>,
) -> AppResult<Response> {
    let comment = state.blog.add_comment(post_id, require_content(&input)?)?;
    Ok((StatusCode::CREATED, json_single(comment)).into_response())
}

/// POST /posts/:id/comments/:comment_id
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    Path((_post_id, comment_id)): Path<(i64, i64)>,
    Json(input): Json<CommentInput>,
) -> AppResult<Json<serde_json::Value>> {
    let comment = state
        .blog
        .update_comment(comment_id, require_content(&input)?)?;
    Ok(json_single(comment))
}

/// POST /posts/:id/comments/:comment_id/delete
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path((_post_id, comment_id)): Path<(i64, i64)>,
) -> AppResult<StatusCode> {
    state.blog.delete_comment(comment_id)?;
    Ok(StatusCode::NO_CONTENT)
}
