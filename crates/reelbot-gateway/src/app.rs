use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use reelbot_core::config::{MessagesConfig, ReelbotConfig};
use reelbot_pipeline::{PipelineContext, PipelineMetrics};
use reelbot_store::{ArtifactRepo, Store, UserRepo};
use reelbot_telegram::Transport;

/// Central shared state, passed as Arc<AppState> to all Axum handlers.
///
/// Immutable after construction apart from the atomic counters in `metrics`.
pub struct AppState {
    pub config: ReelbotConfig,
    pub users: UserRepo,
    pub artifacts: ArtifactRepo,
    pub transport: Box<dyn Transport>,
    pub metrics: PipelineMetrics,
}

impl AppState {
    pub fn new(config: ReelbotConfig, store: Store, transport: Box<dyn Transport>) -> Self {
        Self {
            config,
            users: UserRepo::new(store.clone()),
            artifacts: ArtifactRepo::new(store),
            transport,
            metrics: PipelineMetrics::new(),
        }
    }
}

impl PipelineContext for AppState {
    fn users(&self) -> &UserRepo {
        &self.users
    }
    fn artifacts(&self) -> &ArtifactRepo {
        &self.artifacts
    }
    fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }
    fn messages(&self) -> &MessagesConfig {
        &self.config.messages
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let webhook_path = state.config.gateway.webhook_path.clone();
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route(&webhook_path, post(crate::http::webhook::webhook_handler))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
