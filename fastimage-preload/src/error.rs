use thiserror::Error;
use uuid::Uuid;

/// Failure to hand the final summary to whoever is waiting for it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("Completion receiver is gone")]
    Closed,

    #[error("Completion rejected: {0}")]
    Rejected(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("Preload {batch_id} already resolved")]
    AlreadyResolved { batch_id: Uuid },

    #[error("Preload {batch_id} is not registered")]
    UnknownBatch { batch_id: Uuid },

    #[error("Preload {batch_id} resolved but delivery failed: {source}")]
    Sink {
        batch_id: Uuid,
        #[source]
        source: SinkError,
    },
}

impl BatchError {
    pub fn batch_id(&self) -> Uuid {
        match self {
            BatchError::AlreadyResolved { batch_id }
            | BatchError::UnknownBatch { batch_id }
            | BatchError::Sink { batch_id, .. } => *batch_id,
        }
    }
}
