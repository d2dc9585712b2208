use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8443;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_WEBHOOK_PATH: &str = "/webhook";
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Top-level config (reelbot.toml + REELBOT_* env overrides).
///
/// Built once at startup and handed by value or reference to the transport
/// and store constructors. Nothing reads the environment after `load`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelbotConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Route the platform posts updates to, e.g. "/webhook".
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            webhook_path: DEFAULT_WEBHOOK_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Upper bound for a single outbound Bot API call. There is no retry.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
    /// How long a writer waits on a locked database before giving up.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Command texts and canned replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "default_start_command")]
    pub start_command: String,
    /// Also used as the label of the single keyboard button.
    #[serde(default = "default_artifact_command")]
    pub artifact_command: String,
    #[serde(default = "default_welcome_text")]
    pub welcome_text: String,
    #[serde(default = "default_empty_text")]
    pub empty_text: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            start_command: default_start_command(),
            artifact_command: default_artifact_command(),
            welcome_text: default_welcome_text(),
            empty_text: default_empty_text(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_webhook_path() -> String {
    DEFAULT_WEBHOOK_PATH.to_string()
}
fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}
fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.reelbot/reelbot.db", home)
}
fn default_start_command() -> String {
    "/start".to_string()
}
fn default_artifact_command() -> String {
    "video".to_string()
}
fn default_welcome_text() -> String {
    "Welcome to bot".to_string()
}
fn default_empty_text() -> String {
    "No videos available at the moment.".to_string()
}

impl ReelbotConfig {
    /// Load config from a TOML file with REELBOT_* env var overrides.
    ///
    /// Nested keys use a double underscore, e.g.
    /// `REELBOT_TELEGRAM__BOT_TOKEN` → `telegram.bot_token`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);
        if std::path::Path::new(&path).exists() {
            tracing::debug!(path = %path, "loading config file");
        } else {
            tracing::debug!(path = %path, "config file not found; using defaults and environment");
        }

        let config: ReelbotConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("REELBOT_").split("__"))
            .extract()
            .map_err(|e| crate::error::ReelbotError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(crate::error::ReelbotError::Config(
                "telegram.bot_token must not be empty".to_string(),
            ));
        }
        if !self.gateway.webhook_path.starts_with('/') {
            return Err(crate::error::ReelbotError::Config(format!(
                "gateway.webhook_path must start with '/': {}",
                self.gateway.webhook_path
            )));
        }
        Ok(())
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.reelbot/reelbot.toml", home)
}
