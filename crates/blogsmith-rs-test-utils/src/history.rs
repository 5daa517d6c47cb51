use async_trait::async_trait;
use blogsmith_rs_history::{HistoryError, HistoryProvider};
use blogsmith_rs_protocol::{ContentRecord, NewContentRecord, UserIdentity};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

/// Provider whose every call fails as if the backing store were offline.
#[derive(Debug, Clone, Default)]
pub struct FailingHistory;

#[async_trait]
impl HistoryProvider for FailingHistory {
    async fn find_all_by_user(
        &self,
        _user: &UserIdentity,
    ) -> Result<Vec<ContentRecord>, HistoryError> {
        Err(HistoryError::Unavailable("offline".to_string()))
    }

    async fn insert_one(
        &self,
        _user: &UserIdentity,
        _record: NewContentRecord,
    ) -> Result<ContentRecord, HistoryError> {
        Err(HistoryError::Unavailable("offline".to_string()))
    }

    async fn delete_one(&self, _user: &UserIdentity, _id: &str) -> Result<bool, HistoryError> {
        Err(HistoryError::Unavailable("offline".to_string()))
    }
}

/// Passes reads and inserts through but fails every delete.
#[derive(Clone)]
pub struct UndeletableHistory {
    inner: Arc<dyn HistoryProvider>,
}

impl UndeletableHistory {
    pub fn new(inner: Arc<dyn HistoryProvider>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl HistoryProvider for UndeletableHistory {
    async fn find_all_by_user(
        &self,
        user: &UserIdentity,
    ) -> Result<Vec<ContentRecord>, HistoryError> {
        self.inner.find_all_by_user(user).await
    }

    async fn insert_one(
        &self,
        user: &UserIdentity,
        record: NewContentRecord,
    ) -> Result<ContentRecord, HistoryError> {
        self.inner.insert_one(user, record).await
    }

    async fn delete_one(&self, _user: &UserIdentity, _id: &str) -> Result<bool, HistoryError> {
        Err(HistoryError::Unavailable("delete rejected".to_string()))
    }
}

/// Serves a fixed number of loads, then fails every later load.
///
/// Inserts and deletes always pass through to the wrapped provider.
#[derive(Clone)]
pub struct FlakyLoadHistory {
    inner: Arc<dyn HistoryProvider>,
    healthy_loads: usize,
    loads: Arc<AtomicUsize>,
}

impl FlakyLoadHistory {
    pub fn new(inner: Arc<dyn HistoryProvider>, healthy_loads: usize) -> Self {
        Self {
            inner,
            healthy_loads,
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl HistoryProvider for FlakyLoadHistory {
    async fn find_all_by_user(
        &self,
        user: &UserIdentity,
    ) -> Result<Vec<ContentRecord>, HistoryError> {
        if self.loads.fetch_add(1, Ordering::SeqCst) >= self.healthy_loads {
            return Err(HistoryError::Unavailable("offline".to_string()));
        }
        self.inner.find_all_by_user(user).await
    }

    async fn insert_one(
        &self,
        user: &UserIdentity,
        record: NewContentRecord,
    ) -> Result<ContentRecord, HistoryError> {
        self.inner.insert_one(user, record).await
    }

    async fn delete_one(&self, user: &UserIdentity, id: &str) -> Result<bool, HistoryError> {
        self.inner.delete_one(user, id).await
    }
}

/// Wraps a provider and holds every call until the test releases it.
#[derive(Clone)]
pub struct GatedHistory {
    inner: Arc<dyn HistoryProvider>,
    gate: Arc<Semaphore>,
    calls: Arc<AtomicUsize>,
}

impl GatedHistory {
    pub fn new(inner: Arc<dyn HistoryProvider>) -> Self {
        Self {
            inner,
            gate: Arc::new(Semaphore::new(0)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Let `count` pending or future calls through.
    pub fn release(&self, count: usize) {
        self.gate.add_permits(count);
    }

    /// Number of calls issued so far, released or not.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn pass(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(permit) = self.gate.acquire().await {
            permit.forget();
        }
    }
}

#[async_trait]
impl HistoryProvider for GatedHistory {
    async fn find_all_by_user(
        &self,
        user: &UserIdentity,
    ) -> Result<Vec<ContentRecord>, HistoryError> {
        self.pass().await;
        self.inner.find_all_by_user(user).await
    }

    async fn insert_one(
        &self,
        user: &UserIdentity,
        record: NewContentRecord,
    ) -> Result<ContentRecord, HistoryError> {
        self.pass().await;
        self.inner.insert_one(user, record).await
    }

    async fn delete_one(&self, user: &UserIdentity, id: &str) -> Result<bool, HistoryError> {
        self.pass().await;
        self.inner.delete_one(user, id).await
    }
}
