//! Persistence collaborators for generated-content history.

pub mod error;
pub mod file;
pub mod memory;
pub mod provider;

/// History persistence error type.
pub use error::HistoryError;
/// File-backed document store.
pub use file::FileHistoryProvider;
/// Process-local store.
pub use memory::InMemoryHistoryProvider;
/// Persistence collaborator interface.
pub use provider::HistoryProvider;
