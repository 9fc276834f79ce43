use axum::Json;
use serde_json::{json, Value};

use crate::llm_client::{MAX_TOKENS, MODEL};

/// GET /health
/// Liveness plus the analysis model this build is pinned to.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "resume-ats",
        "version": env!("CARGO_PKG_VERSION"),
        "model": MODEL,
        "max_tokens": MAX_TOKENS
    }))
}
