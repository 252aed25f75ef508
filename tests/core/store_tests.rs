//! Tests for the in-process store backend

use proxyvet::core::store::{MemoryStore, RemoteStore};

#[tokio::test]
async fn test_hash_round_trip() {
    let store = MemoryStore::new();

    store.hset("registry", "a.com", "record-a").await.unwrap();
    store.hset("registry", "b.com", "record-b").await.unwrap();
    store.hset("registry", "a.com", "record-a2").await.unwrap();

    let hash = store.hgetall("registry").await.unwrap();
    assert_eq!(hash.len(), 2);
    assert_eq!(hash["a.com"], "record-a2");
    assert_eq!(hash["b.com"], "record-b");

    store.hdel("registry", "a.com").await.unwrap();
    let hash = store.hgetall("registry").await.unwrap();
    assert!(!hash.contains_key("a.com"));

    // Deleting an absent field is not an error
    store.hdel("registry", "a.com").await.unwrap();
}

#[tokio::test]
async fn test_absent_hash_reads_empty() {
    let store = MemoryStore::new();
    assert!(store.hgetall("nothing").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_write() {
    let store = MemoryStore::new();
    let fields = vec![
        ("a.com".to_string(), "record-a".to_string()),
        ("b.com".to_string(), "record-b".to_string()),
    ];

    store.hset_all("registry", &fields).await.unwrap();

    let hash = store.hgetall("registry").await.unwrap();
    assert_eq!(hash.len(), 2);
    assert_eq!(hash["a.com"], "record-a");
}

#[tokio::test]
async fn test_set_membership() {
    let store = MemoryStore::new();

    assert_eq!(store.srandmember("a.com_cookies").await.unwrap(), None);

    store.sadd("a.com_cookies", "session=1").await.unwrap();
    store.sadd("a.com_cookies", "session=1").await.unwrap();

    assert_eq!(
        store.srandmember("a.com_cookies").await.unwrap(),
        Some("session=1".to_string())
    );
}
