//! Per-session content history synchronized with a persistence provider.
//!
//! Confirmed entries change only after a provider round trip resolves, and
//! the lock guarding the list is never held across an await. Drafts are
//! shown immediately and reconciled by local id once the save resolves.

use crate::error::HistoryStoreError;
use blogsmith_rs_history::HistoryProvider;
use blogsmith_rs_protocol::{
    ContentFilter, ContentRecord, GeneratedContent, HistoryEntry, NewContentRecord, UserIdentity,
};
use chrono::Utc;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// Result of a successful delete round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The provider deleted the record.
    Removed,
    /// The provider had no such record; nothing changed remotely.
    NotFound,
}

/// Ordered, newest-first history for one signed-in user.
pub struct HistoryStore {
    provider: Arc<dyn HistoryProvider>,
    user: UserIdentity,
    entries: Mutex<Vec<HistoryEntry>>,
    abandoned: AtomicBool,
}

impl HistoryStore {
    /// Create an empty store bound to `user` for its whole lifetime.
    pub fn new(provider: Arc<dyn HistoryProvider>, user: UserIdentity) -> Self {
        Self {
            provider,
            user,
            entries: Mutex::new(Vec::new()),
            abandoned: AtomicBool::new(false),
        }
    }

    pub fn user(&self) -> &UserIdentity {
        &self.user
    }

    /// Snapshot of the current list, drafts included.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Detach the store from its owner.
    ///
    /// New operations are rejected. Round trips already in flight leave the
    /// list untouched and report `Abandoned` when they resolve.
    pub fn abandon(&self) {
        if !self.abandoned.swap(true, Ordering::SeqCst) {
            debug!("history store abandoned (user={})", self.user);
        }
    }

    pub fn is_abandoned(&self) -> bool {
        self.abandoned.load(Ordering::SeqCst)
    }

    fn ensure_attached(&self) -> Result<(), HistoryStoreError> {
        if self.is_abandoned() {
            return Err(HistoryStoreError::Abandoned);
        }
        Ok(())
    }

    /// Replace the list with the provider's records, newest first.
    ///
    /// Drafts still awaiting confirmation stay at the head. On failure the
    /// confirmed part of the list is cleared and `LoadFailed` is returned.
    pub async fn load(&self) -> Result<Vec<HistoryEntry>, HistoryStoreError> {
        self.ensure_attached()?;
        let result = self.provider.find_all_by_user(&self.user).await;
        if self.is_abandoned() {
            debug!("discarding load result for abandoned store (ok={})", result.is_ok());
            return Err(HistoryStoreError::Abandoned);
        }

        let mut entries = self.entries.lock();
        entries.retain(HistoryEntry::is_draft);
        match result {
            Ok(records) => {
                let loaded = order_records(records);
                info!(
                    "history loaded (user={}, records={})",
                    self.user,
                    loaded.len()
                );
                entries.extend(loaded.into_iter().map(HistoryEntry::from));
                Ok(entries.clone())
            }
            Err(err) => {
                warn!("history load failed (user={}): {err}", self.user);
                Err(HistoryStoreError::LoadFailed(err.to_string()))
            }
        }
    }

    /// Show `content` as a draft at the head and persist it.
    ///
    /// On success the draft becomes the confirmed record in place, adopting
    /// the provider's id and timestamp. On failure the draft is dropped.
    pub async fn append(
        &self,
        content: GeneratedContent,
    ) -> Result<ContentRecord, HistoryStoreError> {
        self.ensure_attached()?;
        let local_id = Uuid::new_v4();
        let timestamp = Utc::now();
        self.entries
            .lock()
            .insert(0, HistoryEntry::draft(local_id, content.clone(), timestamp));
        debug!("draft added (user={}, local_id={})", self.user, local_id);

        let result = self
            .provider
            .insert_one(&self.user, NewContentRecord { content, timestamp })
            .await;
        if self.is_abandoned() {
            debug!("discarding save result for abandoned store (ok={})", result.is_ok());
            return Err(HistoryStoreError::Abandoned);
        }

        match result {
            Ok(record) => {
                self.confirm_draft(local_id, &record);
                info!("history saved (user={}, id={})", self.user, record.id);
                Ok(record)
            }
            Err(err) => {
                self.entries
                    .lock()
                    .retain(|entry| entry.local_id() != Some(local_id));
                warn!("history save failed (user={}): {err}", self.user);
                Err(HistoryStoreError::SaveFailed(err.to_string()))
            }
        }
    }

    fn confirm_draft(&self, local_id: Uuid, record: &ContentRecord) {
        let mut entries = self.entries.lock();
        let already_listed = entries
            .iter()
            .any(|entry| entry.confirmed_id() == Some(record.id.as_str()));
        let draft_index = entries
            .iter()
            .position(|entry| entry.local_id() == Some(local_id));
        match (draft_index, already_listed) {
            (Some(index), false) => entries[index] = HistoryEntry::from(record.clone()),
            (Some(index), true) => {
                entries.remove(index);
            }
            (None, false) => entries.insert(0, HistoryEntry::from(record.clone())),
            (None, true) => {}
        }
    }

    /// Delete the confirmed record `id`.
    ///
    /// The list changes only after the provider answers; a provider error
    /// leaves it untouched.
    pub async fn remove(&self, id: &str) -> Result<RemoveOutcome, HistoryStoreError> {
        self.ensure_attached()?;
        if id.trim().is_empty() {
            return Err(HistoryStoreError::InvalidInput(
                "record id must not be empty".to_string(),
            ));
        }

        let result = self.provider.delete_one(&self.user, id).await;
        if self.is_abandoned() {
            debug!("discarding delete result for abandoned store (ok={})", result.is_ok());
            return Err(HistoryStoreError::Abandoned);
        }

        match result {
            Ok(deleted) => {
                // A not-found answer also drops any stale local copy.
                self.entries
                    .lock()
                    .retain(|entry| entry.confirmed_id() != Some(id));
                info!(
                    "history delete resolved (user={}, id={}, deleted={})",
                    self.user, id, deleted
                );
                Ok(outcome(deleted))
            }
            Err(err) => {
                warn!("history delete failed (user={}, id={}): {err}", self.user, id);
                Err(HistoryStoreError::DeleteFailed(err.to_string()))
            }
        }
    }

    /// Entries whose prompt or generated text contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<HistoryEntry> {
        self.query(term, ContentFilter::All)
    }

    /// Entries accepted by `filter`.
    pub fn filter_by_type(&self, filter: ContentFilter) -> Vec<HistoryEntry> {
        self.query("", filter)
    }

    /// Search and type filter applied together.
    pub fn query(&self, term: &str, filter: ContentFilter) -> Vec<HistoryEntry> {
        let needle = term.to_lowercase();
        self.entries
            .lock()
            .iter()
            .filter(|entry| filter.accepts(entry.content.content_type))
            .filter(|entry| entry.content.matches_lowercase(&needle))
            .cloned()
            .collect()
    }

    /// Confirmed record with the given id.
    pub fn get(&self, id: &str) -> Option<ContentRecord> {
        self.entries
            .lock()
            .iter()
            .find(|entry| entry.confirmed_id() == Some(id))
            .and_then(HistoryEntry::to_record)
    }
}

fn outcome(deleted: bool) -> RemoveOutcome {
    if deleted {
        RemoveOutcome::Removed
    } else {
        RemoveOutcome::NotFound
    }
}

/// Sort newest first and drop repeated ids, keeping the first seen.
fn order_records(mut records: Vec<ContentRecord>) -> Vec<ContentRecord> {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    let mut seen = HashSet::new();
    records.retain(|record| seen.insert(record.id.clone()));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogsmith_rs_history::InMemoryHistoryProvider;
    use blogsmith_rs_protocol::ContentType;
    use blogsmith_rs_test_utils::{FailingHistory, content, record, user};
    use pretty_assertions::assert_eq;

    fn ids(entries: &[HistoryEntry]) -> Vec<Option<String>> {
        entries
            .iter()
            .map(|entry| entry.confirmed_id().map(str::to_string))
            .collect()
    }

    #[test]
    fn order_records_sorts_newest_first_and_dedupes() {
        let records = vec![
            record("a", ContentType::Blog, "first prompt", "one", 1000),
            record("b", ContentType::Blog, "second prompt", "two", 3000),
            record("a", ContentType::Blog, "first prompt", "one", 1000),
            record("c", ContentType::Blog, "third prompt", "three", 2000),
        ];
        let ordered: Vec<_> = order_records(records)
            .into_iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ordered, vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn failed_load_leaves_store_empty() {
        let store = HistoryStore::new(Arc::new(FailingHistory), user("a@example.com"));
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, HistoryStoreError::LoadFailed(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn confirmed_record_replaces_draft_in_place() {
        let owner = user("a@example.com");
        let provider = Arc::new(InMemoryHistoryProvider::with_records(
            owner.clone(),
            vec![record("old", ContentType::Tweet, "older tweet text", "tweet", 1000)],
        ));
        let store = HistoryStore::new(provider, owner);
        store.load().await.expect("load");

        let saved = store
            .append(content(ContentType::Blog, "Write about cats", "Cats are..."))
            .await
            .expect("append");

        let entries = store.entries();
        assert_eq!(
            ids(&entries),
            vec![Some(saved.id.clone()), Some("old".to_string())]
        );
        assert!(entries.iter().all(|entry| !entry.is_draft()));
        assert_eq!(store.get(&saved.id), Some(saved));
    }

    #[tokio::test]
    async fn remove_of_unknown_id_is_a_noop() {
        let owner = user("a@example.com");
        let provider = Arc::new(InMemoryHistoryProvider::with_records(
            owner.clone(),
            vec![record("1", ContentType::Blog, "Write about cats", "Cats are...", 1000)],
        ));
        let store = HistoryStore::new(provider, owner);
        store.load().await.expect("load");

        let outcome = store.remove("missing").await.expect("remove");
        assert_eq!(outcome, RemoveOutcome::NotFound);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn remove_rejects_blank_ids() {
        let store = HistoryStore::new(
            Arc::new(InMemoryHistoryProvider::new()),
            user("a@example.com"),
        );
        let err = store.remove("  ").await.unwrap_err();
        assert!(matches!(err, HistoryStoreError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn abandoned_store_rejects_new_operations() {
        let store = HistoryStore::new(
            Arc::new(InMemoryHistoryProvider::new()),
            user("a@example.com"),
        );
        store.abandon();
        assert_eq!(store.load().await, Err(HistoryStoreError::Abandoned));
        assert_eq!(
            store
                .append(content(ContentType::Email, "Quarterly update", "Hi"))
                .await,
            Err(HistoryStoreError::Abandoned)
        );
        assert_eq!(store.remove("1").await, Err(HistoryStoreError::Abandoned));
    }

    #[tokio::test]
    async fn query_combines_search_and_type_filter() {
        let owner = user("a@example.com");
        let provider = Arc::new(InMemoryHistoryProvider::with_records(
            owner.clone(),
            vec![
                record("1", ContentType::Blog, "Cats at home", "Cats nap.", 3000),
                record("2", ContentType::Tweet, "Cats on the web", "Meow", 2000),
                record("3", ContentType::Tweet, "Dogs outside", "Woof", 1000),
            ],
        ));
        let store = HistoryStore::new(provider, owner);
        store.load().await.expect("load");

        let found = store.query("CATS", ContentFilter::Only(ContentType::Tweet));
        assert_eq!(ids(&found), vec![Some("2".to_string())]);
    }
}
