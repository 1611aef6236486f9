use super::handlers;
use super::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn post_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/posts",
            get(handlers::posts::list_posts).post(handlers::posts::create_post),
        )
        .route("/posts/search", get(handlers::posts::search_posts))
        .route("/posts/:id", get(handlers::posts::get_post))
        .route(
            "/posts/:id/edit",
            get(handlers::posts::edit_post).post(handlers::posts::update_post),
        )
        .route("/posts/:id/delete", post(handlers::posts::delete_post))
        .route("/posts/:id/like", post(handlers::posts::like_post))
        .route("/tags", get(handlers::posts::list_tags))
}

pub fn comment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/posts/:id/comments",
            post(handlers::comments::add_comment),
        )
        .route(
            "/posts/:id/comments/:comment_id",
            post(handlers::comments::update_comment),
        )
        .route(
            "/posts/:id/comments/:comment_id/delete",
            post(handlers::comments::delete_comment),
        )
}

pub fn media_routes(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/posts/upload-image",
            post(handlers::media::upload_image)
                .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD)),
        )
        .route("/uploads/:filename", get(handlers::media::serve_upload))
}
