//! Webhook ingress endpoint: POST {gateway.webhook_path}.
//!
//! Receives Telegram updates, one per request. The response status is what
//! the platform uses to decide on redelivery:
//!
//! - 200 for handled, ignored, unparseable, or undeliverable-reply updates
//! - 200 with `"ok": false` when the store failed permanently (e.g. a corrupt
//!   row); redelivery would fail the same way
//! - 503 when the store was unreachable; redelivery is safe because inserts
//!   are idempotent
//! - 500 if processing panicked

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::{debug, error, info, info_span, warn, Instrument};

use reelbot_core::update::parse_body;
use reelbot_pipeline::{process_update, UpdateOutcome};

use crate::app::AppState;

/// POST handler for Telegram webhook updates.
pub async fn webhook_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let receipt_id = uuid::Uuid::new_v4().to_string();
    debug!(
        receipt_id = %receipt_id,
        payload = %String::from_utf8_lossy(&body),
        "update received"
    );

    let update = match parse_body(&body) {
        Ok(update) => update,
        Err(e) => {
            // Acknowledge anyway: a malformed body will not parse on redelivery either.
            warn!(receipt_id = %receipt_id, error = %e, "dropping unparseable update");
            state.metrics.record_parse_error();
            return Ok(Json(
                json!({"ok": true, "receipt_id": receipt_id, "outcome": "parse_error"}),
            ));
        }
    };

    // Own task: if the caller hangs up, persistence still runs to completion.
    let task_state = Arc::clone(&state);
    let span = info_span!("webhook", receipt_id = %receipt_id);
    let task = tokio::spawn(
        async move {
            let outcome = process_update(task_state.as_ref(), update).await;
            task_state.metrics.record(&outcome);
            outcome
        }
        .instrument(span),
    );

    let outcome = task.await.map_err(|e| {
        error!(receipt_id = %receipt_id, error = %e, "update processing panicked");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"ok": false, "receipt_id": receipt_id, "error": "internal error"})),
        )
    })?;

    info!(receipt_id = %receipt_id, outcome = outcome.as_str(), "update handled");
    let reply = json!({
        "ok": !matches!(outcome, UpdateOutcome::StoreFailed(_)),
        "receipt_id": receipt_id,
        "outcome": outcome.as_str(),
    });
    match outcome {
        UpdateOutcome::StoreFailed(e) if e.is_transient() => {
            Err((StatusCode::SERVICE_UNAVAILABLE, Json(reply)))
        }
        _ => Ok(Json(reply)),
    }
}
