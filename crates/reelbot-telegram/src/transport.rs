//! Outbound seam between the pipeline and the chat platform.

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::keyboard::ReplyKeyboard;

/// Sends replies to a chat. One call is one attempt: implementations must not
/// retry, and callers must not call twice for the same update.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a text message, optionally with a reply keyboard.
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&ReplyKeyboard>,
    ) -> Result<(), DeliveryError>;

    /// Send a previously stored video by its platform file reference.
    async fn send_artifact(&self, chat_id: i64, artifact_ref: &str) -> Result<(), DeliveryError>;
}
