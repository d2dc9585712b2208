use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use crate::app::AppState;

/// GET /health: liveness probe with collection sizes and pipeline counters.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let users = state.users.count().await;
    let artifacts = state.artifacts.count().await;

    let status = match (&users, &artifacts) {
        (Ok(_), Ok(_)) => "ok",
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "health: store check failed");
            "degraded"
        }
    };

    Json(json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "git_sha": env!("REELBOT_GIT_SHA"),
        "users": users.ok(),
        "artifacts": artifacts.ok(),
        "metrics": state.metrics.snapshot(),
    }))
}
