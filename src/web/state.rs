use crate::error::Result as BlogResult;
use crate::models::Post;
use crate::services::BlogService;
use crate::{Config, Database};
use anyhow::Result;
use std::path::PathBuf;

pub struct AppState {
    pub config: Config,
    pub blog: BlogService,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let upload_dir = PathBuf::from(&config.media.upload_dir);
        let max_upload_bytes = config.media.max_upload_bytes()?;

        Ok(Self {
            blog: BlogService::new(db),
            config,
            upload_dir,
            max_upload_bytes,
        })
    }

    /// Saves a post and its tags, inside a transaction when configured to.
    pub fn save_post(&self, post: &Post, tag_names: &[String]) -> BlogResult<Post> {
        if self.config.content.transactional_saves {
            self.blog.save_post_with_tags_atomic(post, tag_names)
        } else {
            self.blog.save_post_with_tags(post, tag_names)
        }
    }

    /// Page size requested by a client, bounded by the configured maximum.
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.config.content.posts_per_page)
            .clamp(1, self.config.content.max_page_size)
    }
}
