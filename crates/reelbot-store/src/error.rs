use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors that can occur during store operations.
///
/// `AlreadyExists` is deliberately absent: a duplicate key is a normal
/// [`InsertOutcome`](crate::InsertOutcome), never an error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be opened, or stayed locked past the busy timeout.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] rusqlite::Error),

    /// Any other SQLite failure.
    #[error("database error: {0}")]
    Database(#[source] rusqlite::Error),

    /// A stored document no longer matches its record type, or a record
    /// could not be encoded.
    #[error("serialization error in {collection}: {source}")]
    Serialization {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The blocking worker running the query was cancelled or panicked.
    #[error("store task failed: {0}")]
    Task(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::CannotOpen) => {
                StoreError::Unavailable(e)
            }
            _ => StoreError::Database(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
