pub mod comments;
pub mod media;
pub mod posts;

use axum::response::Json;
use serde::Serialize;

fn json_single<T: Serialize>(data: T) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "data": data,
    }))
}
