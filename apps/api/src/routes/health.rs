use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Liveness plus readiness of the completion backend. Never calls the backend.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let ready = state.evaluator.is_ready();
    Json(json!({
        "status": if ready { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "service": "icp-api",
        "completion_backend_configured": ready,
        "model": state.evaluator.model(),
    }))
}

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "ICP Evaluator API is running",
        "status": "healthy"
    }))
}
