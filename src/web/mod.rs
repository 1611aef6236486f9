mod error;
mod handlers;
mod routes;
mod state;

pub use error::{AppError, AppResult};
pub use state::AppState;

use crate::{Config, Database};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::post_routes())
        .merge(routes::comment_routes())
        .merge(routes::media_routes(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: Config, db: Database, addr: &str) -> Result<()> {
    let state = Arc::new(AppState::new(config, db)?);
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
