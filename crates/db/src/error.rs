use thiserror::Error;

/// Failures surfaced by a document store backend.
///
/// None of these are retried by callers; they propagate to the fault handler.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store io error: {0}")]
    Io(String),

    #[error("document store corruption: {0}")]
    Corrupt(String),

    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("document store invalid data: {0}")]
    Invalid(String),

    #[error("document store task failed: {0}")]
    Task(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
