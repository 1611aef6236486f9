pub mod init;
pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pebble-blog")]
#[command(version)]
#[command(about = "A small blog backend with posts, tags and comments", long_about = None)]
pub struct Cli {
    #[arg(short, long, default_value = "blog.toml", env = "PEBBLE_BLOG_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter config and data directories
    Init {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Apply pending database migrations
    Migrate,
    /// Run the HTTP API
    Serve {
        #[arg(short = 'H', long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
}
