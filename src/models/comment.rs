use serde::{Deserialize, Serialize};

/// Author recorded for comments when the caller supplies none.
pub const ANONYMOUS_AUTHOR: &str = "anon";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author: String,
    pub content: String,
    /// RFC 3339, set once when the comment is created.
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentInput {
    pub content: String,
}
