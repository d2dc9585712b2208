use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReelbotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReelbotError {
    /// Short error code string, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            ReelbotError::Config(_) => "CONFIG_ERROR",
            ReelbotError::Io(_) => "IO_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, ReelbotError>;
