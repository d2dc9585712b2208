/// Errors raised while building the Telegram transport.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("no bot token configured")]
    NoToken,
}

/// A single outbound send failed. Never retried by the caller.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// Connection, timeout or body decoding failure.
    #[error("{method} request failed: {source}")]
    Http {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Telegram answered with `ok: false` or a non-success status.
    #[error("{method} rejected by Telegram ({status}): {description}")]
    Rejected {
        method: &'static str,
        status: u16,
        description: String,
    },
}

impl DeliveryError {
    pub fn method(&self) -> &'static str {
        match self {
            DeliveryError::Http { method, .. } | DeliveryError::Rejected { method, .. } => method,
        }
    }
}
