//! Command router for user messages.
//!
//! Stateless: the reply depends only on the message text and the store.
//! Registration and artifact delivery are independent; an unregistered
//! sender asking for a video is served like any other.

use reelbot_core::config::MessagesConfig;
use reelbot_core::types::{UserMessage, UserRecord};
use reelbot_store::InsertOutcome;
use reelbot_telegram::ReplyKeyboard;
use tracing::{debug, info};

use crate::context::PipelineContext;
use crate::dispatch::Reply;
use crate::error::PipelineError;

/// Recognised commands. Matching is on the exact message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    RequestArtifact,
}

impl Command {
    pub fn parse(text: &str, messages: &MessagesConfig) -> Option<Self> {
        if text == messages.start_command {
            Some(Command::Start)
        } else if text == messages.artifact_command {
            Some(Command::RequestArtifact)
        } else {
            None
        }
    }
}

/// Decide the reply for a user message, performing any store side effect.
///
/// `Ok(None)` means the text is not a command: no store access, no reply.
pub async fn route<C: PipelineContext + ?Sized>(
    ctx: &C,
    msg: &UserMessage,
) -> Result<Option<Reply>, PipelineError> {
    let messages = ctx.messages();
    let Some(command) = Command::parse(&msg.text, messages) else {
        debug!(sender_id = msg.sender_id, "not a command; ignoring");
        return Ok(None);
    };

    let reply = match command {
        Command::Start => {
            let outcome = ctx.users().register(UserRecord::from(msg)).await?;
            if outcome == InsertOutcome::Inserted {
                info!(sender_id = msg.sender_id, "new user registered");
            } else {
                debug!(sender_id = msg.sender_id, "user already registered");
            }
            welcome(msg.sender_id, messages)
        }
        Command::RequestArtifact => match ctx.artifacts().sample().await? {
            Some(artifact) => {
                debug!(sender_id = msg.sender_id, content_id = %artifact.content_id, "artifact selected");
                Reply::Artifact {
                    chat_id: msg.sender_id,
                    artifact_ref: artifact.artifact_ref,
                }
            }
            None => Reply::Text {
                chat_id: msg.sender_id,
                text: messages.empty_text.clone(),
                keyboard: None,
            },
        },
    };
    Ok(Some(reply))
}

fn welcome(chat_id: i64, messages: &MessagesConfig) -> Reply {
    Reply::Text {
        chat_id,
        text: messages.welcome_text.clone(),
        keyboard: Some(ReplyKeyboard::single(messages.artifact_command.clone())),
    }
}
