//! Process-local history provider.

use crate::error::HistoryError;
use crate::provider::HistoryProvider;
use async_trait::async_trait;
use blogsmith_rs_protocol::{ContentRecord, NewContentRecord, UserIdentity};
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    records: HashMap<UserIdentity, Vec<ContentRecord>>,
}

/// Local store keeping records for the lifetime of the process.
///
/// Unlike the file store it keeps the caller's timestamp and hands out
/// sequential ids.
#[derive(Debug, Default)]
pub struct InMemoryHistoryProvider {
    inner: Mutex<Inner>,
}

impl InMemoryHistoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records for a user.
    pub fn with_records(user: UserIdentity, records: Vec<ContentRecord>) -> Self {
        let provider = Self::new();
        provider.inner.lock().records.insert(user, records);
        provider
    }
}

#[async_trait]
impl HistoryProvider for InMemoryHistoryProvider {
    async fn find_all_by_user(
        &self,
        user: &UserIdentity,
    ) -> Result<Vec<ContentRecord>, HistoryError> {
        let inner = self.inner.lock();
        Ok(inner.records.get(user).cloned().unwrap_or_default())
    }

    async fn insert_one(
        &self,
        user: &UserIdentity,
        record: NewContentRecord,
    ) -> Result<ContentRecord, HistoryError> {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let stored = ContentRecord {
            id: format!("local-{}", inner.next_id),
            content: record.content,
            timestamp: record.timestamp,
        };
        inner
            .records
            .entry(user.clone())
            .or_default()
            .push(stored.clone());
        debug!("stored local history record (user={}, id={})", user, stored.id);
        Ok(stored)
    }

    async fn delete_one(&self, user: &UserIdentity, id: &str) -> Result<bool, HistoryError> {
        let mut inner = self.inner.lock();
        let Some(records) = inner.records.get_mut(user) else {
            return Ok(false);
        };
        let before = records.len();
        records.retain(|record| record.id != id);
        Ok(records.len() != before)
    }
}
