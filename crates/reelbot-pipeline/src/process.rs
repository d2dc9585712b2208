//! One update, start to finish.

use reelbot_core::types::InboundUpdate;
use reelbot_store::InsertOutcome;
use reelbot_telegram::DeliveryError;
use tracing::{error, info_span, Instrument};

use crate::context::PipelineContext;
use crate::dispatch::dispatch;
use crate::error::PipelineError;
use crate::ingest::ingest;
use crate::router::route;

/// How an update was handled. Failures are values here, not errors, so the
/// caller always gets an answer and can tell "nothing to do" from "broken".
#[derive(Debug)]
pub enum UpdateOutcome {
    /// Neither a user message nor a channel video.
    Ignored,
    /// A user message that is not a command.
    NoReply,
    /// A channel video was persisted (or already was).
    Ingested(InsertOutcome),
    /// A reply was delivered.
    Replied,
    /// The store failed before a reply was decided; nothing was sent.
    StoreFailed(PipelineError),
    /// The reply was decided (and any write committed) but sending it failed.
    DeliveryFailed(DeliveryError),
}

impl UpdateOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOutcome::Ignored => "ignored",
            UpdateOutcome::NoReply => "no_reply",
            UpdateOutcome::Ingested(_) => "ingested",
            UpdateOutcome::Replied => "replied",
            UpdateOutcome::StoreFailed(_) => "store_failed",
            UpdateOutcome::DeliveryFailed(_) => "delivery_failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            UpdateOutcome::StoreFailed(_) | UpdateOutcome::DeliveryFailed(_)
        )
    }
}

/// Route, persist and reply for a single parsed update.
///
/// `None` (an unsupported update) is accepted so callers can pass the parser
/// result straight through.
pub async fn process_update<C: PipelineContext + ?Sized>(
    ctx: &C,
    update: Option<InboundUpdate>,
) -> UpdateOutcome {
    let Some(update) = update else {
        return UpdateOutcome::Ignored;
    };
    let span = info_span!("update", kind = update.kind());

    async move {
        match update {
            InboundUpdate::ChannelPost(post) => match ingest(ctx, &post).await {
                Ok(outcome) => UpdateOutcome::Ingested(outcome),
                Err(e) => {
                    error!(content_id = %post.content_id, code = e.code(), error = %e, "channel ingest failed");
                    UpdateOutcome::StoreFailed(e)
                }
            },
            InboundUpdate::UserMessage(msg) => match route(ctx, &msg).await {
                Ok(None) => UpdateOutcome::NoReply,
                Ok(Some(reply)) => match dispatch(ctx, reply).await {
                    Ok(()) => UpdateOutcome::Replied,
                    Err(e) => UpdateOutcome::DeliveryFailed(e),
                },
                Err(e) => {
                    error!(sender_id = msg.sender_id, code = e.code(), error = %e, "command failed; no reply sent");
                    UpdateOutcome::StoreFailed(e)
                }
            },
        }
    }
    .instrument(span)
    .await
}
