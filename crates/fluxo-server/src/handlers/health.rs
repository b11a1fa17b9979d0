//! Liveness handler

use axum::Json;
use serde_json::{json, Value};

/// GET /api/health - Liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
