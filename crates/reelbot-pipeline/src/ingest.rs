//! Channel ingest: persist each posted video once. Never replies.

use reelbot_core::types::{ArtifactRecord, ChannelPost};
use reelbot_store::InsertOutcome;
use tracing::{debug, info};

use crate::context::PipelineContext;
use crate::error::PipelineError;

pub async fn ingest<C: PipelineContext + ?Sized>(
    ctx: &C,
    post: &ChannelPost,
) -> Result<InsertOutcome, PipelineError> {
    let outcome = ctx.artifacts().ingest(ArtifactRecord::from(post)).await?;
    match outcome {
        InsertOutcome::Inserted => {
            info!(content_id = %post.content_id, "artifact stored");
        }
        // A repost of the same media, or a redelivered update.
        InsertOutcome::AlreadyExists => {
            debug!(content_id = %post.content_id, "artifact already stored");
        }
    }
    Ok(outcome)
}
