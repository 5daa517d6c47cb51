//! Error types for history persistence.

/// Errors returned by history providers.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The backing store could not be reached.
    #[error("history store unavailable: {0}")]
    Unavailable(String),
}
