use crate::BlogError;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

pub struct AppError(anyhow::Error);

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        if let Some(err) = self.0.downcast_ref::<BlogError>() {
            return match err {
                BlogError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
                BlogError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                BlogError::ConstraintViolation(msg) => (StatusCode::CONFLICT, msg.clone()),
                _ => internal(&self.0),
            };
        }
        if let Some(err) = self.0.downcast_ref::<MultipartError>() {
            return (err.status(), err.body_text());
        }
        internal(&self.0)
    }
}

fn internal(err: &anyhow::Error) -> (StatusCode, String) {
    tracing::error!("Application error: {:?}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let body = serde_json::json!({
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message,
        });
        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::from(BlogError::post_not_found(3)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_input_maps_to_400() {
        let err = BlogError::InvalidInput("bad".into());
        assert_eq!(AppError::from(err).into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_constraint_violation_maps_to_409() {
        let err = BlogError::ConstraintViolation("UNIQUE constraint failed: tags.name".into());
        assert_eq!(AppError::from(err).into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_other_errors_map_to_500() {
        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(
            AppError::from(err).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
