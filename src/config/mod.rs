use crate::services::media::parse_size;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub content: ContentConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentConfig {
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: usize,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    /// Run post saves and their tag reconciliation in one transaction.
    #[serde(default)]
    pub transactional_saves: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            posts_per_page: default_posts_per_page(),
            max_page_size: default_max_page_size(),
            transactional_saves: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    pub upload_dir: String,
    #[serde(default = "default_max_upload")]
    pub max_upload_size: String,
}

impl MediaConfig {
    pub fn max_upload_bytes(&self) -> Result<usize> {
        parse_size(&self.max_upload_size).ok_or_else(|| {
            anyhow::anyhow!(
                "media.max_upload_size '{}' is not a size (try \"10MB\")",
                self.max_upload_size
            )
        })
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_pool_size() -> u32 {
    10
}

fn default_posts_per_page() -> usize {
    10
}

fn default_max_page_size() -> usize {
    100
}

fn default_max_upload() -> String {
    "10MB".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!(
                "Could not read config file '{}': {}. Run 'pebble-blog init' first?",
                path.display(),
                e
            )
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.pool_size == 0 {
            anyhow::bail!("database.pool_size must be greater than 0");
        }
        if self.content.max_page_size == 0 {
            anyhow::bail!("content.max_page_size must be greater than 0");
        }
        if self.content.max_page_size > 1000 {
            anyhow::bail!("content.max_page_size must be 1000 or less");
        }
        if self.content.posts_per_page == 0 {
            anyhow::bail!("content.posts_per_page must be greater than 0");
        }
        if self.content.posts_per_page > self.content.max_page_size {
            anyhow::bail!("content.posts_per_page must not exceed content.max_page_size");
        }
        if self.media.max_upload_bytes()? == 0 {
            anyhow::bail!("media.max_upload_size must be greater than 0");
        }
        Ok(())
    }
}
