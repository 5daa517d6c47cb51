//! Error types for the core services.

use thiserror::Error;

/// Errors returned by the generation gateway.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// Request failed local validation; the model was not contacted.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The generation collaborator failed or returned nothing usable.
    #[error("{message}")]
    GenerationFailed { message: String },
}

/// Errors returned by history store operations.
///
/// Every variant leaves the in-memory list in its last known-good state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HistoryStoreError {
    /// Fetching the history failed; the visible history is empty.
    #[error("could not load content history: {0}")]
    LoadFailed(String),
    /// Persisting a draft failed; the draft was dropped.
    #[error("could not save content to history: {0}")]
    SaveFailed(String),
    /// Deleting a record failed; the record is still listed.
    #[error("could not delete content: {0}")]
    DeleteFailed(String),
    /// The operation was rejected before reaching the store.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The store was abandoned by its owner.
    #[error("history store is no longer attached to a session")]
    Abandoned,
}

/// Errors raised while wiring the service together.
#[derive(Debug, Error)]
pub enum BlogsmithCoreError {
    /// Config value missing or unusable.
    #[error("config error: {0}")]
    Config(String),
    /// LLM provider construction failed.
    #[error("llm error: {0}")]
    Llm(String),
    /// History provider construction failed.
    #[error("history error: {0}")]
    History(#[from] blogsmith_rs_history::HistoryError),
}
