use std::sync::Arc;

use slack_relay::core::user_tokens::CredentialStore;
use slack_relay::errors::RelayError;
use slack_relay::infrastructure::persistence::SqliteTokenStore;
use tempfile::TempDir;

async fn fresh_store() -> (TempDir, SqliteTokenStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteTokenStore::new(dir.path().join("slack_tokens.db"));
    store.initialize().await.unwrap();
    (dir, store)
}

#[tokio::test]
async fn test_last_write_wins() {
    let (_dir, store) = fresh_store().await;

    store.upsert("U1", "tok-a").await.unwrap();
    store.upsert("U1", "tok-b").await.unwrap();

    assert_eq!(store.lookup("U1").await.unwrap().as_deref(), Some("tok-b"));
}

#[tokio::test]
async fn test_unknown_user_is_none_not_error() {
    let (_dir, store) = fresh_store().await;

    assert_eq!(store.lookup("U-unknown").await.unwrap(), None);
}

#[tokio::test]
async fn test_initialize_is_idempotent_and_keeps_data() {
    let (_dir, store) = fresh_store().await;
    store.upsert("U1", "tok-a").await.unwrap();

    store.initialize().await.unwrap();
    store.initialize().await.unwrap();

    assert_eq!(store.lookup("U1").await.unwrap().as_deref(), Some("tok-a"));
}

#[tokio::test]
async fn test_tokens_survive_a_new_store_instance() {
    let (dir, store) = fresh_store().await;
    store.upsert("U1", "tok-a").await.unwrap();
    drop(store);

    let reopened = SqliteTokenStore::new(dir.path().join("slack_tokens.db"));
    reopened.initialize().await.unwrap();
    assert_eq!(reopened.lookup("U1").await.unwrap().as_deref(), Some("tok-a"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_upserts_for_distinct_users() {
    let (_dir, store) = fresh_store().await;
    let store = Arc::new(store);

    let a = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.upsert("U1", "tok-1").await })
    };
    let b = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.upsert("U2", "tok-2").await })
    };
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    assert_eq!(store.lookup("U1").await.unwrap().as_deref(), Some("tok-1"));
    assert_eq!(store.lookup("U2").await.unwrap().as_deref(), Some("tok-2"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_upserts_same_user_leave_one_intact_token() {
    let (_dir, store) = fresh_store().await;
    let store = Arc::new(store);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.upsert("U1", &format!("tok-{i}")).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let token = store.lookup("U1").await.unwrap().unwrap();
    let n: u32 = token.strip_prefix("tok-").unwrap().parse().unwrap();
    assert!(n < 8);
}

#[tokio::test]
async fn test_unreachable_database_is_storage_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened as a database file.
    let store = SqliteTokenStore::new(dir.path());

    let err = store.initialize().await.unwrap_err();
    assert!(matches!(err, RelayError::StorageUnavailable(_)));

    let err = store.lookup("U1").await.unwrap_err();
    assert!(matches!(err, RelayError::StorageUnavailable(_)));
}

#[tokio::test]
async fn test_store_behind_trait_object() {
    let (_dir, store) = fresh_store().await;
    let store: Arc<dyn CredentialStore> = Arc::new(store);

    store.upsert("U9", "xoxp-9").await.unwrap();
    assert_eq!(store.lookup("U9").await.unwrap().as_deref(), Some("xoxp-9"));
}
