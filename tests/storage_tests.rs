//! Storage backend tests
//!
//! File adapter edge cases (missing, blank, corrupt and duplicate stores)
//! and the SeaORM adapter on SQLite.

use std::fs;

use chrono::Utc;
use tempfile::TempDir;

use tinylink::config::{StorageBackend, StorageConfig};
use tinylink::errors::TinylinkError;
use tinylink::storage::{
    FileStorage, RecordPatch, SeaOrmStorage, Storage, StorageFactory, UrlRecord,
};

fn record(code: &str, url: &str) -> UrlRecord {
    UrlRecord::new(code, url, Utc::now())
}

fn rename_patch(code: &str) -> RecordPatch {
    RecordPatch {
        url: None,
        code: Some(code.to_string()),
        updated_at: Utc::now(),
    }
}

async fn sqlite_storage(dir: &TempDir) -> SeaOrmStorage {
    let db_path = dir.path().join("storage_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    SeaOrmStorage::new(&db_url, 5)
        .await
        .expect("Failed to create storage")
}

// =============================================================================
// File adapter
// =============================================================================

#[actix_rt::test]
async fn test_missing_file_is_created_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("urls.json");

    let storage = FileStorage::new(&path).unwrap();
    assert!(path.exists());
    assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
    assert!(storage.load_all().await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_blank_file_is_empty_collection() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("urls.json");
    fs::write(&path, "  \n").unwrap();

    let storage = FileStorage::new(&path).unwrap();
    assert!(storage.load_all().await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_corrupt_file_fails_and_is_preserved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("urls.json");
    let garbage = "{ this is not json";
    fs::write(&path, garbage).unwrap();

    let result = FileStorage::new(&path);
    assert!(matches!(result, Err(TinylinkError::StorageFailure(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), garbage);
}

#[actix_rt::test]
async fn test_corruption_after_open_blocks_writes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("urls.json");
    let storage = FileStorage::new(&path).unwrap();

    fs::write(&path, "[{\"broken\":").unwrap();

    let result = storage.insert(record("abc", "https://example.com")).await;
    assert!(matches!(result, Err(TinylinkError::StorageFailure(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), "[{\"broken\":");
}

#[actix_rt::test]
async fn test_duplicate_codes_in_file_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("urls.json");
    let now = Utc::now().to_rfc3339();
    let json = format!(
        r#"[{{"code":"dup","url":"https://a.example","created_at":"{now}"}},
            {{"code":"dup","url":"https://b.example","created_at":"{now}"}}]"#
    );
    fs::write(&path, &json).unwrap();

    assert!(matches!(
        FileStorage::new(&path),
        Err(TinylinkError::StorageFailure(_))
    ));
    assert_eq!(fs::read_to_string(&path).unwrap(), json);
}

#[actix_rt::test]
async fn test_file_keeps_insertion_order_and_optional_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("urls.json");
    let json = r#"[
        {"code":"first","url":"https://1.example","created_at":"2026-01-02T00:00:00Z"},
        {"code":"second","url":"https://2.example","created_at":"2026-01-01T00:00:00Z","clicks":4}
    ]"#;
    fs::write(&path, json).unwrap();

    let storage = FileStorage::new(&path).unwrap();
    let records = storage.load_all().await.unwrap();
    let codes: Vec<&str> = records.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, ["first", "second"]);
    assert_eq!(records[0].clicks, 0);
    assert_eq!(records[1].clicks, 4);
}

#[actix_rt::test]
async fn test_file_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("urls.json");

    {
        let storage = FileStorage::new(&path).unwrap();
        storage.insert(record("persist", "https://p.example")).await.unwrap();
        storage.record_click("persist", Utc::now()).await.unwrap();
    }

    let reopened = FileStorage::new(&path).unwrap();
    let stored = reopened.get("persist").await.unwrap().unwrap();
    assert_eq!(stored.url, "https://p.example");
    assert_eq!(stored.clicks, 1);
    assert!(stored.last_accessed.is_some());
}

#[actix_rt::test]
async fn test_file_rename_conflict_leaves_store_unchanged() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path().join("urls.json")).unwrap();
    storage.insert(record("one", "https://1.example")).await.unwrap();
    storage.insert(record("two", "https://2.example")).await.unwrap();

    let result = storage.update("one", rename_patch("two")).await;
    assert!(matches!(result, Err(TinylinkError::CodeConflict(_))));
    assert!(storage.contains("one").await.unwrap());
    assert_eq!(
        storage.get("two").await.unwrap().unwrap().url,
        "https://2.example"
    );
}

// =============================================================================
// SeaORM adapter (SQLite)
// =============================================================================

#[actix_rt::test]
async fn test_sqlite_insert_and_get() {
    let dir = TempDir::new().unwrap();
    let storage = sqlite_storage(&dir).await;
    assert_eq!(storage.backend_name(), "sqlite");

    storage.insert(record("db1", "https://db.example")).await.unwrap();
    let stored = storage.get("db1").await.unwrap().unwrap();
    assert_eq!(stored.url, "https://db.example");
    assert_eq!(stored.clicks, 0);
    assert!(storage.get("nope").await.unwrap().is_none());
}

#[actix_rt::test]
async fn test_sqlite_duplicate_insert_is_conflict() {
    let dir = TempDir::new().unwrap();
    let storage = sqlite_storage(&dir).await;

    storage.insert(record("same", "https://1.example")).await.unwrap();
    let result = storage.insert(record("same", "https://2.example")).await;
    assert!(matches!(result, Err(TinylinkError::CodeConflict(_))));
    assert_eq!(
        storage.get("same").await.unwrap().unwrap().url,
        "https://1.example"
    );
}

#[actix_rt::test]
async fn test_sqlite_rename_moves_row() {
    let dir = TempDir::new().unwrap();
    let storage = sqlite_storage(&dir).await;

    storage.insert(record("old", "https://r.example")).await.unwrap();
    storage.record_click("old", Utc::now()).await.unwrap();

    let renamed = storage.update("old", rename_patch("new-code")).await.unwrap();
    assert_eq!(renamed.code, "new-code");
    assert_eq!(renamed.clicks, 1);
    assert!(renamed.updated_at.is_some());

    assert!(storage.get("old").await.unwrap().is_none());
    let stored = storage.get("new-code").await.unwrap().unwrap();
    assert_eq!(stored.clicks, 1);
    assert_eq!(stored.url, "https://r.example");
}

#[actix_rt::test]
async fn test_sqlite_rename_conflict_rolls_back() {
    let dir = TempDir::new().unwrap();
    let storage = sqlite_storage(&dir).await;

    storage.insert(record("a", "https://a.example")).await.unwrap();
    storage.insert(record("b", "https://b.example")).await.unwrap();

    let result = storage.update("a", rename_patch("b")).await;
    assert!(matches!(result, Err(TinylinkError::CodeConflict(_))));
    assert!(storage.contains("a").await.unwrap());
    assert_eq!(storage.load_all().await.unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_sqlite_missing_rows_are_not_found() {
    let dir = TempDir::new().unwrap();
    let storage = sqlite_storage(&dir).await;

    assert!(matches!(
        storage.record_click("ghost", Utc::now()).await,
        Err(TinylinkError::NotFound(_))
    ));
    assert!(matches!(
        storage.remove("ghost").await,
        Err(TinylinkError::NotFound(_))
    ));
    assert!(matches!(
        storage.update("ghost", rename_patch("x")).await,
        Err(TinylinkError::NotFound(_))
    ));
}

#[actix_rt::test]
async fn test_sqlite_remove_returns_record() {
    let dir = TempDir::new().unwrap();
    let storage = sqlite_storage(&dir).await;

    storage.insert(record("bye", "https://bye.example")).await.unwrap();
    let removed = storage.remove("bye").await.unwrap();
    assert_eq!(removed.code, "bye");
    assert!(storage.load_all().await.unwrap().is_empty());
}

// =============================================================================
// Factory
// =============================================================================

#[actix_rt::test]
async fn test_factory_picks_backend_from_config() {
    let dir = TempDir::new().unwrap();

    let file = StorageFactory::create(&StorageConfig {
        backend: StorageBackend::File,
        file_path: dir.path().join("f.json").display().to_string(),
        ..StorageConfig::default()
    })
    .await
    .unwrap();
    assert_eq!(file.backend_name(), "file");

    let database = StorageFactory::create(&StorageConfig {
        backend: StorageBackend::Database,
        database_url: format!("sqlite://{}?mode=rwc", dir.path().join("f.db").display()),
        ..StorageConfig::default()
    })
    .await
    .unwrap();
    assert_eq!(database.backend_name(), "sqlite");
}

#[actix_rt::test]
async fn test_factory_rejects_unknown_database_scheme() {
    let result = StorageFactory::create(&StorageConfig {
        backend: StorageBackend::Database,
        database_url: "mongodb://localhost/links".to_string(),
        ..StorageConfig::default()
    })
    .await;
    assert!(matches!(result, Err(TinylinkError::Config(_))));
}
