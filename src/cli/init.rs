use anyhow::Result;
use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = r#"[server]
host = "127.0.0.1"
port = 3000

[database]
path = "./data/blog.db"
pool_size = 10

[content]
posts_per_page = 10
max_page_size = 100
transactional_saves = false

[media]
upload_dir = "./data/uploads"
max_upload_size = "10MB"
"#;

pub async fn run(path: PathBuf) -> Result<()> {
    let config_path = path.join("blog.toml");
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    std::fs::create_dir_all(path.join("data/uploads"))?;
    std::fs::write(&config_path, DEFAULT_CONFIG)?;

    tracing::info!("Created new blog at {:?}", path);
    tracing::info!("Run 'pebble-blog migrate' to set up the database");
    tracing::info!("Run 'pebble-blog serve' to start the server");

    Ok(())
}
