// tests/message_store_tests.rs
mod common;

use common::*;
use messagely::messages::MAX_BODY_LEN;
use messagely::DirectoryError;

#[tokio::test]
async fn create_assigns_ids_and_timestamps() {
    let store = setup_store().await;
    register(&store, "ann", "pw").await;
    register(&store, "bob", "pw").await;

    let first = store.messages.create("ann", "bob", "one").await.unwrap();
    let second = store.messages.create("bob", "ann", "two").await.unwrap();

    assert!(second.id > first.id);
    assert_eq!(first.from_username, "ann");
    assert_eq!(first.to_username, "bob");
    assert!(first.read_at.is_none());
    assert!(second.sent_at >= first.sent_at);

    let fetched = store.messages.get(first.id).await.unwrap();
    assert_eq!(fetched.body, "one");
    assert_eq!(fetched.sent_at, first.sent_at);
}

#[tokio::test]
async fn create_to_unknown_user_is_not_found() {
    let store = setup_store().await;
    register(&store, "ann", "pw").await;

    let err = store.messages.create("ann", "ghost", "hello?").await.unwrap_err();
    assert!(matches!(err, DirectoryError::NotFound(_)));
    assert!(store.directory.messages_from("ann").await.unwrap().is_empty());
}

#[tokio::test]
async fn mark_read_sets_read_at() {
    let store = setup_store().await;
    register(&store, "ann", "pw").await;
    register(&store, "bob", "pw").await;
    let msg = store.messages.create("ann", "bob", "read me").await.unwrap();

    let (id, read_at) = store.messages.mark_read(msg.id).await.unwrap();
    assert_eq!(id, msg.id);
    assert!(read_at >= msg.sent_at);

    let fetched = store.messages.get(msg.id).await.unwrap();
    assert_eq!(fetched.read_at, Some(read_at));
}

#[tokio::test]
async fn unknown_message_is_not_found() {
    let store = setup_store().await;

    assert!(matches!(store.messages.get(42).await.unwrap_err(), DirectoryError::NotFound(_)));
    assert!(matches!(store.messages.mark_read(42).await.unwrap_err(), DirectoryError::NotFound(_)));
}

#[tokio::test]
async fn body_length_is_bounded() {
    let store = setup_store().await;
    register(&store, "ann", "pw").await;
    register(&store, "bob", "pw").await;

    let err = store.messages.create("ann", "bob", "").await.unwrap_err();
    assert!(matches!(err, DirectoryError::Validation(_)));

    let err = store.messages.create("ann", "bob", &"x".repeat(MAX_BODY_LEN + 1)).await.unwrap_err();
    assert!(matches!(err, DirectoryError::Validation(_)));
    assert_eq!(err.status_code(), 400);

    let longest = store.messages.create("ann", "bob", &"x".repeat(MAX_BODY_LEN)).await.unwrap();
    assert_eq!(longest.body.len(), MAX_BODY_LEN);
}
