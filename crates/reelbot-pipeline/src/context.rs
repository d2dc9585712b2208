//! What the pipeline needs from its host.

use reelbot_core::config::MessagesConfig;
use reelbot_store::{ArtifactRepo, UserRepo};
use reelbot_telegram::Transport;

/// Implemented by `AppState` in `reelbot-gateway` and by test harnesses.
///
/// Everything behind it is safe for concurrent use; the pipeline holds no
/// state of its own between updates.
pub trait PipelineContext: Send + Sync {
    fn users(&self) -> &UserRepo;
    fn artifacts(&self) -> &ArtifactRepo;
    fn transport(&self) -> &dyn Transport;
    fn messages(&self) -> &MessagesConfig;
}
