//! Persistence collaborator interface.

use crate::error::HistoryError;
use async_trait::async_trait;
use blogsmith_rs_protocol::{ContentRecord, NewContentRecord, UserIdentity};

#[async_trait]
/// Durable store for a user's content records.
///
/// Records are always addressed by the owning user; no operation reaches
/// across users even when an id is known.
pub trait HistoryProvider: Send + Sync {
    /// Every record owned by `user`, in no guaranteed order.
    async fn find_all_by_user(&self, user: &UserIdentity)
    -> Result<Vec<ContentRecord>, HistoryError>;

    /// Persist a new record and return it with its assigned id.
    ///
    /// The returned timestamp is authoritative; providers that keep their
    /// own clock replace the caller's value.
    async fn insert_one(
        &self,
        user: &UserIdentity,
        record: NewContentRecord,
    ) -> Result<ContentRecord, HistoryError>;

    /// Delete the record `id` owned by `user`.
    ///
    /// Returns `false` when no such record exists for this user.
    async fn delete_one(&self, user: &UserIdentity, id: &str) -> Result<bool, HistoryError>;
}
