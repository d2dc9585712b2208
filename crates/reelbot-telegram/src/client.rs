//! Bot API client implementing [`Transport`].
//!
//! Plain JSON POSTs to `{api_base_url}/bot{token}/{method}`. Each call is a
//! single attempt bounded by the configured request timeout.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use reelbot_core::config::TelegramConfig;

use crate::error::{DeliveryError, TelegramError};
use crate::keyboard::ReplyKeyboard;
use crate::transport::Transport;

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a ReplyKeyboard>,
}

#[derive(Debug, Serialize)]
struct SendVideo<'a> {
    chat_id: i64,
    video: &'a str,
}

/// The envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramTransport {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl TelegramTransport {
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        if config.bot_token.trim().is_empty() {
            return Err(TelegramError::NoToken);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.bot_token.clone(),
        })
    }

    async fn call<B: Serialize + ?Sized>(
        &self,
        method: &'static str,
        body: &B,
        chat_id: i64,
    ) -> Result<(), DeliveryError> {
        let url = format!("{}/bot{}/{}", self.base_url, self.token, method);
        debug!(method, chat_id, token = %mask_token(&self.token), "Bot API call");

        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            // reqwest errors carry the URL, which embeds the token.
            .map_err(|source| DeliveryError::Http {
                method,
                source: source.without_url(),
            })?;

        let status = resp.status();
        let parsed: Option<ApiResponse> = resp.json().await.ok();
        match parsed {
            Some(ApiResponse { ok: true, .. }) if status.is_success() => Ok(()),
            other => {
                let description = other
                    .and_then(|r| r.description)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
                warn!(method, chat_id, status = status.as_u16(), %description, "Bot API rejected call");
                Err(DeliveryError::Rejected {
                    method,
                    status: status.as_u16(),
                    description,
                })
            }
        }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&ReplyKeyboard>,
    ) -> Result<(), DeliveryError> {
        let body = SendMessage {
            chat_id,
            text,
            reply_markup: keyboard,
        };
        self.call("sendMessage", &body, chat_id).await
    }

    async fn send_artifact(&self, chat_id: i64, artifact_ref: &str) -> Result<(), DeliveryError> {
        let body = SendVideo {
            chat_id,
            video: artifact_ref,
        };
        self.call("sendVideo", &body, chat_id).await
    }
}

/// Keep the bot id, hide the secret: `123456:ABC...xyz` → `123456:***`.
pub fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((id, _)) => format!("{id}:***"),
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_token_hides_secret() {
        assert_eq!(mask_token("123456:ABCdef"), "123456:***");
        assert_eq!(mask_token("no-colon"), "***");
    }

    #[test]
    fn send_message_omits_empty_markup() {
        let body = SendMessage {
            chat_id: 1,
            text: "hi",
            reply_markup: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("reply_markup"));
    }

    #[test]
    fn empty_token_is_rejected() {
        let cfg = TelegramConfig {
            bot_token: String::new(),
            api_base_url: "http://localhost".to_string(),
            request_timeout_secs: 1,
        };
        assert!(matches!(
            TelegramTransport::new(&cfg),
            Err(TelegramError::NoToken)
        ));
    }
}
