use super::json_single;
use crate::services::media;
use crate::web::error::AppResult;
use crate::web::state::AppState;
use crate::BlogError;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use std::sync::Arc;

/// POST /posts/upload-image
///
/// Expects a multipart body with the image in a field named `file`.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> AppResult<Json<serde_json::Value>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let name = field.file_name().unwrap_or("image").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await?;

        let uploaded = media::upload_image(
            &state.upload_dir,
            &name,
            &content_type,
            &data,
            state.max_upload_bytes,
        )?;
        return Ok(json_single(uploaded));
    }

    Err(BlogError::InvalidInput("Missing multipart field 'file'".into()).into())
}

/// GET /uploads/:filename
pub async fn serve_upload(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let Some(file_path) = media::resolve_upload(&state.upload_dir, &filename) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let content = tokio::fs::read(&file_path).await?;
    let mime = mime_guess::from_path(&filename).first_or_octet_stream();

    Ok((
        [
            (header::CONTENT_TYPE, mime.as_ref().to_string()),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
        ],
        content,
    )
        .into_response())
}
