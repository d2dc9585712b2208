use reelbot_store::StoreError;
use thiserror::Error;

/// Failures while deciding what to do with an update.
///
/// Delivery failures are reported separately as
/// [`DeliveryError`](reelbot_telegram::DeliveryError): by then the decision
/// has been made and any store write has completed.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The database could not be reached in time. Redelivering the update
    /// later may succeed.
    #[error(transparent)]
    StoreUnavailable(StoreError),

    /// The store answered but the operation cannot succeed as-is, e.g. a
    /// stored document that no longer decodes.
    #[error(transparent)]
    Store(StoreError),
}

impl PipelineError {
    /// True when the same update may succeed on redelivery.
    pub fn is_transient(&self) -> bool {
        matches!(self, PipelineError::StoreUnavailable(_))
    }

    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            PipelineError::Store(_) => "STORE_ERROR",
        }
    }
}

impl From<StoreError> for PipelineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(_) | StoreError::Task(_) => PipelineError::StoreUnavailable(e),
            StoreError::Database(_) | StoreError::Serialization { .. } => PipelineError::Store(e),
        }
    }
}
