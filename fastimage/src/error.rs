use fastimage_preload::BatchError;
use thiserror::Error;
use uuid::Uuid;

/// Failure of the image loader for a single source or cache operation
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Unexpected status {0}")]
    Status(u16),

    #[error("Request timed out")]
    Timeout,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported source: {0}")]
    Unsupported(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LoadError::Timeout
        } else if let Some(status) = err.status() {
            LoadError::Status(status.as_u16())
        } else {
            LoadError::Http(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum PreloadError {
    #[error("Preload {batch_id} was dropped before it resolved")]
    Abandoned { batch_id: Uuid },

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("Loader error: {0}")]
    Loader(#[from] LoadError),
}
