//! Content records and the draft/confirmed history entry model.

use crate::ProtocolError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Fixed set of content kinds the generator can produce.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Blog,
    Tweet,
    Email,
    #[serde(rename = "ad-copy", alias = "ad copy")]
    AdCopy,
}

impl ContentType {
    /// Every content type, in display order.
    pub const ALL: [ContentType; 4] = [
        ContentType::Blog,
        ContentType::Tweet,
        ContentType::Email,
        ContentType::AdCopy,
    ];

    /// Wire name of the content type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Blog => "blog",
            ContentType::Tweet => "tweet",
            ContentType::Email => "email",
            ContentType::AdCopy => "ad-copy",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Blog => "Blog Post",
            ContentType::Tweet => "Tweet",
            ContentType::Email => "Email",
            ContentType::AdCopy => "Ad Copy",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ProtocolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "blog" => Ok(ContentType::Blog),
            "tweet" => Ok(ContentType::Tweet),
            "email" => Ok(ContentType::Email),
            "ad-copy" | "ad copy" | "ad_copy" => Ok(ContentType::AdCopy),
            _ => Err(ProtocolError::UnknownContentType(value.to_string())),
        }
    }
}

/// Type filter applied to a history listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentFilter {
    #[default]
    All,
    Only(ContentType),
}

impl ContentFilter {
    /// Whether a content type passes the filter.
    pub fn accepts(&self, content_type: ContentType) -> bool {
        match self {
            ContentFilter::All => true,
            ContentFilter::Only(expected) => *expected == content_type,
        }
    }
}

impl FromStr for ContentFilter {
    type Err = ProtocolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(ContentFilter::All);
        }
        value.parse().map(ContentFilter::Only)
    }
}

/// Generated text together with the parameters that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedContent {
    pub content_type: ContentType,
    pub length: String,
    pub tone: String,
    pub prompt: String,
    pub generated_content: String,
}

impl GeneratedContent {
    /// Case-insensitive substring match on prompt or generated text.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.prompt.to_lowercase().contains(needle)
            || self.generated_content.to_lowercase().contains(needle)
    }
}

/// Payload handed to a persistence collaborator for insertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewContentRecord {
    #[serde(flatten)]
    pub content: GeneratedContent,
    /// Client-side creation time; collaborators may replace it.
    pub timestamp: DateTime<Utc>,
}

/// Content record acknowledged by the persistence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentRecord {
    /// Collaborator-assigned identifier.
    pub id: String,
    #[serde(flatten)]
    pub content: GeneratedContent,
    pub timestamp: DateTime<Utc>,
}

impl ContentRecord {
    /// File name used when exporting the generated text.
    pub fn export_file_name(&self) -> String {
        let kind = self.content.content_type.as_str().replace(['-', ' '], "_");
        format!("{kind}_{}.txt", self.id)
    }
}

/// Persistence state of an in-memory history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordState {
    /// Held locally while the save round trip is pending.
    Draft { local_id: Uuid },
    /// Acknowledged by the persistence collaborator.
    Confirmed { id: String },
}

/// Entry in a user's in-memory history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub state: RecordState,
    pub content: GeneratedContent,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create a draft entry tracked by `local_id` until it is confirmed.
    pub fn draft(local_id: Uuid, content: GeneratedContent, timestamp: DateTime<Utc>) -> Self {
        Self {
            state: RecordState::Draft { local_id },
            content,
            timestamp,
        }
    }

    /// Confirmed id, if the entry has been persisted.
    pub fn confirmed_id(&self) -> Option<&str> {
        match &self.state {
            RecordState::Confirmed { id } => Some(id.as_str()),
            RecordState::Draft { .. } => None,
        }
    }

    /// Local id, if the entry is still a draft.
    pub fn local_id(&self) -> Option<Uuid> {
        match &self.state {
            RecordState::Draft { local_id } => Some(*local_id),
            RecordState::Confirmed { .. } => None,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self.state, RecordState::Draft { .. })
    }

    /// Convert back to a record; drafts have no record form.
    pub fn to_record(&self) -> Option<ContentRecord> {
        self.confirmed_id().map(|id| ContentRecord {
            id: id.to_string(),
            content: self.content.clone(),
            timestamp: self.timestamp,
        })
    }
}

impl From<ContentRecord> for HistoryEntry {
    fn from(record: ContentRecord) -> Self {
        Self {
            state: RecordState::Confirmed { id: record.id },
            content: record.content,
            timestamp: record.timestamp,
        }
    }
}
