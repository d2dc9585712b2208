pub mod config;
pub mod error;
pub mod types;
pub mod update;

pub use config::ReelbotConfig;
pub use error::{ReelbotError, Result};
pub use types::{ArtifactRecord, ChannelPost, InboundUpdate, UserMessage, UserRecord};
pub use update::{parse, parse_body, ParseError};
