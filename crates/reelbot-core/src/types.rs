use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One webhook delivery, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundUpdate {
    UserMessage(UserMessage),
    ChannelPost(ChannelPost),
}

impl InboundUpdate {
    /// Short label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            InboundUpdate::UserMessage(_) => "user_message",
            InboundUpdate::ChannelPost(_) => "channel_post",
        }
    }
}

/// A text message sent to the bot by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserMessage {
    pub sender_id: i64,
    pub text: String,
    /// The full `message` object as delivered.
    pub raw: Value,
}

/// A video broadcast in a channel the bot is a member of.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPost {
    /// Platform-assigned `file_unique_id`; stable across re-uploads.
    pub content_id: String,
    /// `file_id` usable to send the same media back.
    pub artifact_ref: String,
    /// The full `channel_post` object as delivered.
    pub raw: Value,
}

/// Stored once per distinct sender. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub sender_id: i64,
    pub first_seen_payload: Value,
}

impl From<&UserMessage> for UserRecord {
    fn from(msg: &UserMessage) -> Self {
        Self {
            sender_id: msg.sender_id,
            first_seen_payload: msg.raw.clone(),
        }
    }
}

/// Stored once per distinct `content_id`. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub content_id: String,
    pub artifact_ref: String,
    pub raw_payload: Value,
}

impl From<&ChannelPost> for ArtifactRecord {
    fn from(post: &ChannelPost) -> Self {
        Self {
            content_id: post.content_id.clone(),
            artifact_ref: post.artifact_ref.clone(),
            raw_payload: post.raw.clone(),
        }
    }
}
