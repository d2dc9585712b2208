//! Reply dispatcher: exactly one outbound call per reply, no retries.

use reelbot_telegram::{DeliveryError, ReplyKeyboard};
use tracing::{debug, warn};

use crate::context::PipelineContext;

/// The single outbound action an update may produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text {
        chat_id: i64,
        text: String,
        keyboard: Option<ReplyKeyboard>,
    },
    Artifact {
        chat_id: i64,
        artifact_ref: String,
    },
}

impl Reply {
    pub fn chat_id(&self) -> i64 {
        match self {
            Reply::Text { chat_id, .. } | Reply::Artifact { chat_id, .. } => *chat_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Text { .. } => "text",
            Reply::Artifact { .. } => "artifact",
        }
    }
}

/// Send `reply` through the context's transport. Consumes the reply so it
/// cannot be sent twice.
pub async fn dispatch<C: PipelineContext + ?Sized>(
    ctx: &C,
    reply: Reply,
) -> Result<(), DeliveryError> {
    let chat_id = reply.chat_id();
    let kind = reply.kind();
    let transport = ctx.transport();

    let result = match &reply {
        Reply::Text {
            chat_id,
            text,
            keyboard,
        } => transport.send_text(*chat_id, text, keyboard.as_ref()).await,
        Reply::Artifact {
            chat_id,
            artifact_ref,
        } => transport.send_artifact(*chat_id, artifact_ref).await,
    };

    match &result {
        Ok(()) => debug!(chat_id, kind, "reply sent"),
        Err(e) => warn!(chat_id, kind, error = %e, "reply delivery failed"),
    }
    result
}
