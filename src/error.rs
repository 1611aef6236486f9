use thiserror::Error;

/// Failures surfaced by the stores and the blog service.
#[derive(Debug, Error)]
pub enum BlogError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BlogError {
    pub fn post_not_found(id: i64) -> Self {
        Self::NotFound { entity: "Post", id }
    }

    pub fn comment_not_found(id: i64) -> Self {
        Self::NotFound { entity: "Comment", id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<rusqlite::Error> for BlogError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::ConstraintViolation(msg.unwrap_or_else(|| e.to_string()))
            }
            other => Self::Database(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;
