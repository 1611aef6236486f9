use super::json_single;
use crate::models::{PostForm, Post};
use crate::services::tags::{format_tags, parse_tags};
use crate::web::error::AppResult;
use crate::web::state::AppState;
use crate::BlogError;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ListParams {
    pub tag: Option<String>,
    pub page: Option<usize>,
    pub size: Option<usize>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize)]
pub struct LikeParams {
    pub like: bool,
}

fn validate_form(form: &PostForm) -> Result<(), BlogError> {
    if form.title.trim().is_empty() {
        return Err(BlogError::InvalidInput("Title is required".into()));
    }
    Ok(())
}

/// GET /posts
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<serde_json::Value>> {
    let page = params.page.unwrap_or(0);
    let size = state.page_size(params.size);
    let tag = params.tag.as_deref().filter(|t| !t.trim().is_empty());

    let listing = state.blog.list_posts(page, size, tag)?;

    Ok(Json(serde_json::json!({
        "data": listing,
        "meta": {
            "total": listing.total,
            "page": page,
            "size": size,
            "tag": tag,
        }
    })))
}

/// POST /posts
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Json(form): Json<PostForm>,
) -> AppResult<Response> {
    validate_form(&form)?;
    let (post, tags) = form.into_post(None, 0);
    let saved = state.save_post(&post, &parse_tags(tags.as_deref()))?;

    Ok((StatusCode::CREATED, json_single(saved)).into_response())
}

/// GET /posts/:id
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let detail = state
        .blog
        .get_post_detail(id)?
        .ok_or_else(|| BlogError::post_not_found(id))?;
    Ok(json_single(detail))
}

/// GET /posts/:id/edit
pub async fn edit_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let post = find_existing(&state, id)?;
    let tags = state.blog.find_tags_by_post_id(id)?;

    Ok(json_single(serde_json::json!({
        "post": post,
        "tags_as_text": format_tags(&tags),
        "tags": tags,
    })))
}

/// POST /posts/:id/edit
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(form): Json<PostForm>,
) -> AppResult<Json<serde_json::Value>> {
    validate_form(&form)?;
    let existing = find_existing(&state, id)?;
    let (post, tags) = form.into_post(Some(id), existing.likes);
    let saved = state.save_post(&post, &parse_tags(tags.as_deref()))?;

    Ok(json_single(saved))
}

/// POST /posts/:id/delete
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.blog.delete_post(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /posts/:id/like
pub async fn like_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(params): Json<LikeParams>,
) -> AppResult<Json<serde_json::Value>> {
    let post = state.blog.set_like(id, params.like)?;
    Ok(json_single(post))
}

/// GET /posts/search?q=
pub async fn search_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<serde_json::Value>> {
    let query = params.q.trim();
    let posts = if query.is_empty() {
        Vec::new()
    } else {
        state.blog.find_posts_by_title(query)?
    };
    Ok(json_single(posts))
}

/// GET /tags
pub async fn list_tags(State(state): State<Arc<AppState>>) -> AppResult<Json<serde_json::Value>> {
    let tags = state.blog.list_tags()?;
    Ok(json_single(tags))
}

fn find_existing(state: &AppState, id: i64) -> Result<Post, BlogError> {
    state
        .blog
        .find_post(id)?
        .ok_or_else(|| BlogError::post_not_found(id))
}
