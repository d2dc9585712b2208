//! Inbound update parser.
//!
//! Turns a decoded webhook body into at most one [`InboundUpdate`]. Anything
//! that is valid JSON but carries neither a text message nor a channel video
//! maps to `None`; only undecodable bodies are errors.

use serde_json::Value;

use crate::types::{ChannelPost, InboundUpdate, UserMessage};

/// The body could not be decoded as an update at all.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("update must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Decode raw bytes and classify the update.
pub fn parse_body(body: &[u8]) -> Result<Option<InboundUpdate>, ParseError> {
    let raw: Value = serde_json::from_slice(body)?;
    if !raw.is_object() {
        return Err(ParseError::NotAnObject(json_type_name(&raw)));
    }
    Ok(parse(&raw))
}

/// Classify an already-decoded update.
///
/// A user message wins over a channel post when both are present.
pub fn parse(raw: &Value) -> Option<InboundUpdate> {
    if let Some(msg) = raw.get("message").and_then(parse_user_message) {
        return Some(InboundUpdate::UserMessage(msg));
    }
    raw.get("channel_post")
        .and_then(parse_channel_post)
        .map(InboundUpdate::ChannelPost)
}

fn parse_user_message(message: &Value) -> Option<UserMessage> {
    let sender_id = message.get("from")?.get("id")?.as_i64()?;
    let text = message.get("text")?.as_str()?;
    Some(UserMessage {
        sender_id,
        text: text.to_string(),
        raw: message.clone(),
    })
}

fn parse_channel_post(post: &Value) -> Option<ChannelPost> {
    // Accept both a list of videos and the single object the Bot API sends.
    let video = match post.get("video")? {
        Value::Array(items) => items.first()?,
        obj @ Value::Object(_) => obj,
        _ => return None,
    };
    let content_id = video.get("file_unique_id")?.as_str()?;
    let artifact_ref = video.get("file_id")?.as_str()?;
    Some(ChannelPost {
        content_id: content_id.to_string(),
        artifact_ref: artifact_ref.to_string(),
        raw: post.clone(),
    })
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
