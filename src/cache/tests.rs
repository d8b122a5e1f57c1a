use std::path::Path;

use serde_json::json;

use super::*;
use crate::log::LogLevel;

fn session_dir() -> ArcPath {
    ArcPath::from(Path::new("/var/cache/pricewatch/sessions"))
}

fn products_key(page: &str) -> RequestKey {
    RequestKey::new("products", [("page", page)])
}

#[tokio::test]
async fn test_mock_put_is_idempotent_and_last_write_wins() {
    let cache = SessionCache::mock();
    let key = products_key("1");

    cache.put(key.clone(), json!({"items": [1]})).await;
    cache.put(key.clone(), json!({"items": [1]})).await;
    assert_eq!(cache.len().await, 1);
    assert_eq!(cache.get(key.clone()).await, Some(json!({"items": [1]})));

    cache.put(key.clone(), json!({"items": [2]})).await;
    assert_eq!(cache.get(key).await, Some(json!({"items": [2]})));
}

#[tokio::test]
async fn test_actual_put_get_and_write_through() {
    let fs = Fs::mock().unwrap();
    let cache = SessionCache::spawn(fs.clone(), Log::mock(), session_dir(), ArcStr::from("s1"))
        .await
        .unwrap();

    assert!(cache.is_empty().await);
    assert_eq!(cache.get(products_key("1")).await, None);

    cache.put(products_key("1"), json!({"items": []})).await;
    assert_eq!(cache.get(products_key("1")).await, Some(json!({"items": []})));
    assert_eq!(cache.len().await, 1);

    let stored = fs
        .read_to_string(ArcPath::from(session_dir().join("s1.json")))
        .await
        .unwrap();
    assert!(stored.contains("products?page=1"));
}

#[tokio::test]
async fn test_reopening_session_restores_entries() {
    let fs = Fs::mock().unwrap();
    let first = SessionCache::spawn(fs.clone(), Log::mock(), session_dir(), ArcStr::from("s1"))
        .await
        .unwrap();
    first.put(products_key("1"), json!({"page": 1})).await;
    first.put(products_key("2"), json!({"page": 2})).await;

    let reloaded = SessionCache::spawn(fs.clone(), Log::mock(), session_dir(), ArcStr::from("s1"))
        .await
        .unwrap();
    assert_eq!(reloaded.len().await, 2);
    assert_eq!(reloaded.get(products_key("2")).await, Some(json!({"page": 2})));

    let other = SessionCache::spawn(fs, Log::mock(), session_dir(), ArcStr::from("s2"))
        .await
        .unwrap();
    assert!(other.is_empty().await);
}

#[tokio::test]
async fn test_end_session_deletes_store() {
    let fs = Fs::mock().unwrap();
    let cache = SessionCache::spawn(fs.clone(), Log::mock(), session_dir(), ArcStr::from("s1"))
        .await
        .unwrap();
    cache.put(products_key("1"), json!(1)).await;

    cache.end_session().await.unwrap();
    assert!(cache.is_empty().await);
    assert!(
        fs.read_to_string(ArcPath::from(session_dir().join("s1.json")))
            .await
            .is_err()
    );

    // Ending twice is harmless
    cache.end_session().await.unwrap();
}

#[tokio::test]
async fn test_clear_keeps_session_usable() {
    let fs = Fs::mock().unwrap();
    let cache = SessionCache::spawn(fs, Log::mock(), session_dir(), ArcStr::from("s1"))
        .await
        .unwrap();
    cache.put(products_key("1"), json!(1)).await;
    cache.clear().await;
    assert!(cache.is_empty().await);
    cache.put(products_key("1"), json!(2)).await;
    assert_eq!(cache.get(products_key("1")).await, Some(json!(2)));
}

#[tokio::test]
async fn test_corrupt_session_file_starts_empty_with_warning() {
    let fs = Fs::mock().unwrap();
    let log = Log::mock();
    fs.mkdir(session_dir()).await.unwrap();
    fs.write(
        ArcPath::from(session_dir().join("s1.json")),
        ArcStr::from("{not json"),
    )
    .await
    .unwrap();

    let cache = SessionCache::spawn(fs, log.clone(), session_dir(), ArcStr::from("s1"))
        .await
        .unwrap();
    assert!(cache.is_empty().await);

    let messages = log.get_messages().unwrap();
    assert!(
        messages
            .iter()
            .any(|m| m.level == LogLevel::Warning && m.scope == "cache")
    );
}

#[tokio::test]
async fn test_invalid_session_id_is_rejected() {
    let fs = Fs::mock().unwrap();
    for id in ["", "../escape", ".hidden"] {
        let result =
            SessionCache::spawn(fs.clone(), Log::mock(), session_dir(), ArcStr::from(id)).await;
        assert!(result.is_err(), "{id:?} should be rejected");
    }
}
