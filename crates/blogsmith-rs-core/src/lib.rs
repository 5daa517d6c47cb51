//! Core services for Blogsmith.
//!
//! This crate owns the per-user history store, the generation gateway, and
//! the service object that wires them to their collaborators.

pub mod error;
pub mod gateway;
pub mod history_store;
pub mod llm;
pub mod service;

pub use error::{BlogsmithCoreError, GenerationError, HistoryStoreError};
pub use gateway::{GENERATION_FAILED_MESSAGE, GenerationGateway, MIN_PROMPT_CHARS};
pub use history_store::{HistoryStore, RemoveOutcome};
pub use llm::build_llm_provider;
pub use service::{Blogsmith, build_history_provider};
