//! History store integration tests against local and gated providers.

use blogsmith_rs_core::{HistoryStore, HistoryStoreError, RemoveOutcome};
use blogsmith_rs_history::{HistoryProvider, InMemoryHistoryProvider};
use blogsmith_rs_protocol::{ContentFilter, ContentType, HistoryEntry};
use blogsmith_rs_test_utils::{
    FailingHistory, FlakyLoadHistory, GatedHistory, UndeletableHistory, content, record, user,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn confirmed_ids(entries: &[HistoryEntry]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| entry.confirmed_id().map(str::to_string))
        .collect()
}

async fn wait_for_calls(gate: &GatedHistory, calls: usize) {
    while gate.calls() < calls {
        tokio::task::yield_now().await;
    }
}

fn cats_and_dogs() -> Arc<InMemoryHistoryProvider> {
    Arc::new(InMemoryHistoryProvider::with_records(
        user("writer@example.com"),
        vec![
            record("1", ContentType::Blog, "Write about cats", "Cats are...", 1000),
            record("2", ContentType::Tweet, "Write about dogs", "Dogs are...", 2000),
        ],
    ))
}

/// Loading orders records newest first.
#[tokio::test]
async fn load_orders_newest_first() {
    let store = HistoryStore::new(cats_and_dogs(), user("writer@example.com"));
    let entries = store.load().await.expect("load");
    assert_eq!(confirmed_ids(&entries), vec!["2", "1"]);
}

/// Search is case-insensitive and an empty term returns everything.
#[tokio::test]
async fn search_matches_prompt_or_content_ignoring_case() {
    let store = HistoryStore::new(cats_and_dogs(), user("writer@example.com"));
    store.load().await.expect("load");

    assert_eq!(confirmed_ids(&store.search("CAT")), vec!["1"]);
    assert_eq!(confirmed_ids(&store.search("dogs are")), vec!["2"]);
    assert_eq!(confirmed_ids(&store.search("")), vec!["2", "1"]);
    assert!(store.search("parrots").is_empty());
}

/// Type filtering keeps only the selected type; `All` keeps everything.
#[tokio::test]
async fn filter_by_type_selects_matching_entries() {
    let store = HistoryStore::new(cats_and_dogs(), user("writer@example.com"));
    store.load().await.expect("load");

    assert_eq!(
        confirmed_ids(&store.filter_by_type(ContentFilter::Only(ContentType::Blog))),
        vec!["1"]
    );
    assert!(
        store
            .filter_by_type(ContentFilter::Only(ContentType::Email))
            .is_empty()
    );
    assert_eq!(
        confirmed_ids(&store.filter_by_type(ContentFilter::All)),
        vec!["2", "1"]
    );
}

/// Appending then removing the new record restores the previous list.
#[tokio::test]
async fn append_then_remove_restores_list() {
    let store = HistoryStore::new(cats_and_dogs(), user("writer@example.com"));
    let before = store.load().await.expect("load");

    let saved = store
        .append(content(ContentType::Email, "Welcome new subscribers", "Hello!"))
        .await
        .expect("append");
    assert_eq!(store.len(), 3);
    assert_eq!(store.entries()[0].confirmed_id(), Some(saved.id.as_str()));

    let outcome = store.remove(&saved.id).await.expect("remove");
    assert_eq!(outcome, RemoveOutcome::Removed);
    assert_eq!(store.entries(), before);
}

/// Records are scoped to their owner.
#[tokio::test]
async fn other_users_see_nothing() {
    let provider = cats_and_dogs();
    let store = HistoryStore::new(provider, user("someone-else@example.com"));
    assert!(store.load().await.expect("load").is_empty());
}

/// A draft is visible while the save is pending and confirmed afterwards.
#[tokio::test]
async fn draft_is_visible_until_save_resolves() {
    let gate = GatedHistory::new(Arc::new(InMemoryHistoryProvider::new()));
    let store = HistoryStore::new(Arc::new(gate.clone()), user("writer@example.com"));

    let append = store.append(content(ContentType::Blog, "Write about cats", "Cats are..."));
    let observe = async {
        wait_for_calls(&gate, 1).await;
        let snapshot = store.entries();
        gate.release(1);
        snapshot
    };
    let (saved, pending) = tokio::join!(append, observe);
    let saved = saved.expect("append");

    assert_eq!(pending.len(), 1);
    assert!(pending[0].is_draft());
    assert_eq!(pending[0].content.prompt, "Write about cats");

    let entries = store.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].confirmed_id(), Some(saved.id.as_str()));
}

/// A failed save shows the draft, then drops it and reports `SaveFailed`.
#[tokio::test]
async fn failed_save_drops_draft() {
    let gate = GatedHistory::new(Arc::new(FailingHistory));
    let store = HistoryStore::new(Arc::new(gate.clone()), user("writer@example.com"));

    let append = store.append(content(
        ContentType::Tweet,
        "Launch day announcement",
        "We're live",
    ));
    let observe = async {
        wait_for_calls(&gate, 1).await;
        let snapshot = store.entries();
        gate.release(1);
        snapshot
    };
    let (result, pending) = tokio::join!(append, observe);

    assert!(matches!(result, Err(HistoryStoreError::SaveFailed(_))));
    assert_eq!(pending.len(), 1);
    assert!(pending[0].is_draft());
    assert!(store.is_empty());
}

/// Two concurrent removes of one id yield one `Removed` and one `NotFound`.
#[tokio::test]
async fn concurrent_double_remove_removes_once() {
    let provider = cats_and_dogs();
    let gate = GatedHistory::new(provider.clone());
    let store = HistoryStore::new(Arc::new(gate.clone()), user("writer@example.com"));
    gate.release(1);
    store.load().await.expect("load");

    let first = store.remove("1");
    let second = store.remove("1");
    let release = async {
        wait_for_calls(&gate, 3).await;
        assert_eq!(store.len(), 2);
        gate.release(2);
    };
    let (first, second, ()) = tokio::join!(first, second, release);

    let mut outcomes = vec![first.expect("remove"), second.expect("remove")];
    outcomes.sort_by_key(|outcome| *outcome == RemoveOutcome::NotFound);
    assert_eq!(outcomes, vec![RemoveOutcome::Removed, RemoveOutcome::NotFound]);
    assert_eq!(confirmed_ids(&store.entries()), vec!["2"]);

    let remaining = provider
        .find_all_by_user(&user("writer@example.com"))
        .await
        .expect("find");
    assert_eq!(remaining.len(), 1);
}

/// A failed delete leaves the list unchanged.
#[tokio::test]
async fn failed_delete_keeps_record() {
    let provider = Arc::new(UndeletableHistory::new(cats_and_dogs()));
    let store = HistoryStore::new(provider, user("writer@example.com"));
    let before = store.load().await.expect("load");

    let err = store.remove("1").await.unwrap_err();
    assert!(matches!(err, HistoryStoreError::DeleteFailed(_)));
    assert_eq!(store.entries(), before);
}

/// Loading from an unreachable provider reports `LoadFailed` with an empty list.
#[tokio::test]
async fn unreachable_load_reports_failure() {
    let store = HistoryStore::new(Arc::new(FailingHistory), user("writer@example.com"));
    let err = store.load().await.unwrap_err();
    assert!(matches!(err, HistoryStoreError::LoadFailed(_)));
    assert!(store.entries().is_empty());
}

/// A failed reload clears previously loaded records.
#[tokio::test]
async fn failed_reload_clears_loaded_records() {
    let provider = Arc::new(FlakyLoadHistory::new(cats_and_dogs(), 1));
    let store = HistoryStore::new(provider, user("writer@example.com"));
    assert_eq!(store.load().await.expect("load").len(), 2);

    let err = store.load().await.unwrap_err();
    assert!(matches!(err, HistoryStoreError::LoadFailed(_)));
    assert!(store.is_empty());
}

/// A draft whose save is still pending survives a failed reload.
#[tokio::test]
async fn failed_reload_keeps_pending_draft() {
    let gate = GatedHistory::new(cats_and_dogs());
    let provider = Arc::new(FlakyLoadHistory::new(Arc::new(gate.clone()), 1));
    let store = HistoryStore::new(provider, user("writer@example.com"));
    gate.release(1);
    store.load().await.expect("load");

    let append = store.append(content(ContentType::Email, "Welcome new subscribers", "Hello!"));
    let reload = async {
        wait_for_calls(&gate, 2).await;
        let result = store.load().await;
        let snapshot = store.entries();
        gate.release(1);
        (result, snapshot)
    };
    let (saved, (reloaded, during)) = tokio::join!(append, reload);
    let saved = saved.expect("append");

    assert!(matches!(reloaded, Err(HistoryStoreError::LoadFailed(_))));
    assert_eq!(during.len(), 1);
    assert!(during[0].is_draft());
    assert_eq!(during[0].content.prompt, "Welcome new subscribers");
    assert_eq!(confirmed_ids(&store.entries()), vec![saved.id]);
}

/// A save resolving after abandonment reports `Abandoned` and leaves the list alone.
#[tokio::test]
async fn abandoned_store_ignores_late_save() {
    let gate = GatedHistory::new(Arc::new(InMemoryHistoryProvider::new()));
    let store = HistoryStore::new(Arc::new(gate.clone()), user("writer@example.com"));

    let append = store.append(content(ContentType::Blog, "Write about cats", "Cats are..."));
    let abandon = async {
        wait_for_calls(&gate, 1).await;
        store.abandon();
        let snapshot = store.entries();
        gate.release(1);
        snapshot
    };
    let (saved, at_abandon) = tokio::join!(append, abandon);

    assert_eq!(saved, Err(HistoryStoreError::Abandoned));
    assert_eq!(store.entries(), at_abandon);
    assert!(store.entries()[0].is_draft());
    assert_eq!(store.load().await, Err(HistoryStoreError::Abandoned));
}

/// A delete that resolves after abandonment also reports `Abandoned`.
#[tokio::test]
async fn abandoned_store_ignores_late_delete() {
    let gate = GatedHistory::new(cats_and_dogs());
    let store = HistoryStore::new(Arc::new(gate.clone()), user("writer@example.com"));
    gate.release(1);
    let before = store.load().await.expect("load");

    let remove = store.remove("1");
    let abandon = async {
        wait_for_calls(&gate, 2).await;
        store.abandon();
        gate.release(1);
    };
    let (removed, ()) = tokio::join!(remove, abandon);

    assert_eq!(removed, Err(HistoryStoreError::Abandoned));
    assert_eq!(store.entries(), before);
}
