use clap::Parser;
use pebble_blog::cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pebble_blog=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { path }) => {
            pebble_blog::cli::init::run(path).await?;
        }
        Some(Commands::Migrate) => {
            pebble_blog::cli::migrate::run(&cli.config).await?;
        }
        Some(Commands::Serve { host, port }) => {
            pebble_blog::cli::serve::run(&cli.config, host, port).await?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
