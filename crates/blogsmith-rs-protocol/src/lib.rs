//! Shared domain types for Blogsmith content records, requests and identities.

mod content;
mod identity;

pub use content::{
    ContentFilter, ContentRecord, ContentType, GeneratedContent, HistoryEntry, NewContentRecord,
    RecordState,
};
pub use identity::UserIdentity;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing protocol values from user input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// Content type outside the fixed set.
    #[error("unknown content type: {0}")]
    UnknownContentType(String),
    /// User identity was empty or malformed.
    #[error("invalid user identity: {0}")]
    InvalidIdentity(String),
}

/// Structured request forwarded to the generation collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Kind of content to produce.
    pub content_type: ContentType,
    /// Free-form length hint (e.g. "Short").
    pub length: String,
    /// Free-form tone hint (e.g. "Friendly").
    pub tone: String,
    /// Topic or instructions supplied by the user.
    pub prompt: String,
}

impl GenerationRequest {
    /// Build a request from its parts.
    pub fn new(
        content_type: ContentType,
        length: impl Into<String>,
        tone: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            content_type,
            length: length.into(),
            tone: tone.into(),
            prompt: prompt.into(),
        }
    }

    /// Pair this request with the text produced for it.
    pub fn into_content(self, generated_content: impl Into<String>) -> GeneratedContent {
        GeneratedContent {
            content_type: self.content_type,
            length: self.length,
            tone: self.tone,
            prompt: self.prompt,
            generated_content: generated_content.into(),
        }
    }
}
