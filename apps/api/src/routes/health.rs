use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and active strategies.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-api",
        "extraction_strategy": format!("{:?}", state.config.extraction_strategy).to_lowercase(),
        "job_matcher": state.job_matcher.backend(),
    }))
}
