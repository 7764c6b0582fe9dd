use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};

pub async fn health_check() -> Result<Json<Value>, StatusCode> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "magcat",
        "version": env!("CARGO_PKG_VERSION")
    })))
}
