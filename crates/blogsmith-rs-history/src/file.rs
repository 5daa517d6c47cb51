//! File-backed history provider storing one JSONL document per user.

use crate::error::HistoryError;
use crate::provider::HistoryProvider;
use async_trait::async_trait;
use blogsmith_rs_protocol::{ContentRecord, NewContentRecord, UserIdentity};
use chrono::Utc;
use log::{debug, info};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Namespace for deriving per-user file names.
const USER_FILE_NAMESPACE: Uuid = Uuid::from_u128(0x6d1f_3b2a_9c4e_4f0b_8a5d_2e7c_1b9f_04a3);

/// Line format of a user's history file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    owner: String,
    #[serde(flatten)]
    record: ContentRecord,
}

/// Document store keeping each user's records in `<root>/<user>.jsonl`.
///
/// Ids are UUID strings and timestamps are assigned on insert.
#[derive(Debug)]
pub struct FileHistoryProvider {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileHistoryProvider {
    /// Open (creating if needed) a store under `root`.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        info!("initialized file history provider (root={})", root.display());
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to a user's JSONL file. The name is a name-based UUID of the
    /// identity, so it is fixed-length and filesystem safe.
    fn user_path(&self, user: &UserIdentity) -> PathBuf {
        let name = Uuid::new_v5(&USER_FILE_NAMESPACE, user.as_str().as_bytes());
        self.root.join(format!("{name}.jsonl"))
    }

    fn load_records(&self, user: &UserIdentity) -> Result<Vec<ContentRecord>, HistoryError> {
        let path = self.user_path(user);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = OpenOptions::new().read(true).open(path)?;
        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let stored: StoredRecord = serde_json::from_str(&line)?;
            if stored.owner == user.as_str() {
                records.push(stored.record);
            }
        }
        Ok(records)
    }

    /// Rewrite a user's records atomically via a temp file.
    fn write_records(
        &self,
        user: &UserIdentity,
        records: &[ContentRecord],
    ) -> Result<(), HistoryError> {
        let path = self.user_path(user);
        let temp_path = path.with_extension("jsonl.tmp");
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            for record in records {
                writeln!(file, "{}", encode_line(user, record)?)?;
            }
        }
        std::fs::rename(temp_path, path)?;
        Ok(())
    }
}

fn encode_line(user: &UserIdentity, record: &ContentRecord) -> Result<String, HistoryError> {
    Ok(serde_json::to_string(&StoredRecord {
        owner: user.as_str().to_string(),
        record: record.clone(),
    })?)
}

#[async_trait]
impl HistoryProvider for FileHistoryProvider {
    async fn find_all_by_user(
        &self,
        user: &UserIdentity,
    ) -> Result<Vec<ContentRecord>, HistoryError> {
        let records = self.load_records(user)?;
        debug!("loaded history (user={}, count={})", user, records.len());
        Ok(records)
    }

    async fn insert_one(
        &self,
        user: &UserIdentity,
        record: NewContentRecord,
    ) -> Result<ContentRecord, HistoryError> {
        let stored = ContentRecord {
            id: Uuid::new_v4().to_string(),
            content: record.content,
            timestamp: Utc::now(),
        };
        let line = encode_line(user, &stored)?;
        let _guard = self.write_lock.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.user_path(user))?;
        writeln!(file, "{line}")?;
        debug!(
            "stored history record (user={}, id={}, content_len={})",
            user,
            stored.id,
            stored.content.generated_content.len()
        );
        Ok(stored)
    }

    async fn delete_one(&self, user: &UserIdentity, id: &str) -> Result<bool, HistoryError> {
        let _guard = self.write_lock.lock();
        let mut records = self.load_records(user)?;
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            debug!("delete found nothing (user={}, id={})", user, id);
            return Ok(false);
        }
        self.write_records(user, &records)?;
        debug!("deleted history record (user={}, id={})", user, id);
        Ok(true)
    }
}
