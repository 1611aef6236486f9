use super::{Comment, Tag};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Assigned by storage on first save.
    pub id: Option<i64>,
    pub title: String,
    pub preview: String,
    pub image_url: Option<String>,
    pub text: String,
    #[serde(default)]
    pub likes: u32,
}

impl Post {
    pub fn new(title: impl Into<String>, preview: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            preview: preview.into(),
            image_url: None,
            text: text.into(),
            likes: 0,
        }
    }
}

/// Body of the create and edit requests. `tags` is the raw comma-separated
/// string typed by the author.
#[derive(Debug, Deserialize)]
pub struct PostForm {
    pub title: String,
    #[serde(default)]
    pub preview: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub text: String,
    pub tags: Option<String>,
}

impl PostForm {
    pub fn into_post(self, id: Option<i64>, likes: u32) -> (Post, Option<String>) {
        let post = Post {
            id,
            title: self.title,
            preview: self.preview,
            image_url: self.image_url.filter(|url| !url.trim().is_empty()),
            text: self.text,
            likes,
        };
        (post, self.tags)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostListing {
    pub items: Vec<Post>,
    pub total: i64,
    pub tags_by_post_id: HashMap<i64, Vec<Tag>>,
    pub comment_count_by_post_id: HashMap<i64, i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub tags: Vec<Tag>,
    pub comments: Vec<Comment>,
}
