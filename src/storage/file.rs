//! JSON file storage
//!
//! The whole collection lives in one JSON array. Every operation loads the
//! file; every mutation rewrites it. A process-wide read/write lock makes
//! each load-check-write sequence atomic, and writes go through a temp file
//! plus rename so readers never observe a half-written document.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, error, info};

use super::{RecordPatch, Storage, UrlRecord};
use crate::errors::{Result, TinylinkError};

pub struct FileStorage {
    file_path: PathBuf,
    lock: RwLock<()>,
}

impl FileStorage {
    /// Open the store, creating an empty one if the file does not exist
    ///
    /// An existing file that cannot be parsed is reported as
    /// `StorageFailure` and left untouched.
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self> {
        let storage = FileStorage {
            file_path: file_path.as_ref().to_path_buf(),
            lock: RwLock::new(()),
        };

        let _guard = storage.lock.write();
        if storage.file_path.exists() {
            let links = storage.load_from_file()?;
            info!(
                "FileStorage initialized with {} records from {}",
                links.len(),
                storage.file_path.display()
            );
        } else {
            info!("Link file not found, creating empty storage");
            storage.save_to_file(&[])?;
            info!("Created empty link file: {}", storage.file_path.display());
        }
        drop(_guard);

        Ok(storage)
    }

    /// Read and validate the whole collection; caller must hold the lock
    fn load_from_file(&self) -> Result<Vec<UrlRecord>> {
        let content = match fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            // 文件在运行期间被删除：视为空集合，下一次写入会重新创建
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                error!("Failed to read link file: {}", e);
                return Err(TinylinkError::storage_failure(format!(
                    "Failed to read {}: {}",
                    self.file_path.display(),
                    e
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<UrlRecord> = serde_json::from_str(&content).map_err(|e| {
            error!("Failed to parse link file: {}", e);
            TinylinkError::storage_failure(format!(
                "Failed to parse {}: {}",
                self.file_path.display(),
                e
            ))
        })?;

        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.code.as_str()) {
                error!("Duplicate code '{}' in link file", record.code);
                return Err(TinylinkError::storage_failure(format!(
                    "Duplicate code '{}' in {}",
                    record.code,
                    self.file_path.display()
                )));
            }
        }

        debug!("Loaded {} records from file", records.len());
        Ok(records)
    }

    /// Replace the file contents atomically; caller must hold the write lock
    fn save_to_file(&self, records: &[UrlRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;

        let mut tmp_path = self.file_path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        fs::write(&tmp_path, json).map_err(|e| {
            TinylinkError::storage_failure(format!(
                "Failed to write {}: {}",
                tmp_path.display(),
                e
            ))
        })?;
        fs::rename(&tmp_path, &self.file_path).map_err(|e| {
            TinylinkError::storage_failure(format!(
                "Failed to replace {}: {}",
                self.file_path.display(),
                e
            ))
        })?;
        Ok(())
    }

    /// Run a read-modify-write cycle under the exclusive lock
    ///
    /// Nothing is written when `f` returns an error.
    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<UrlRecord>) -> Result<T>) -> Result<T> {
        let _guard = self.lock.write();
        let mut records = self.load_from_file()?;
        let result = f(&mut records)?;
        self.save_to_file(&records)?;
        Ok(result)
    }

    fn read<T>(&self, f: impl FnOnce(Vec<UrlRecord>) -> T) -> Result<T> {
        let _guard = self.lock.read();
        Ok(f(self.load_from_file()?))
    }
}

fn position_of(records: &[UrlRecord], code: &str) -> Result<usize> {
    records
        .iter()
        .position(|r| r.code == code)
        .ok_or_else(|| TinylinkError::not_found(format!("Link '{}' not found", code)))
}

#[async_trait]
impl Storage for FileStorage {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    async fn load_all(&self) -> Result<Vec<UrlRecord>> {
        self.read(|records| records)
    }

    async fn get(&self, code: &str) -> Result<Option<UrlRecord>> {
        self.read(|records| records.into_iter().find(|r| r.code == code))
    }

    async fn insert(&self, record: UrlRecord) -> Result<()> {
        let code = record.code.clone();
        self.mutate(|records| {
            if records.iter().any(|r| r.code == record.code) {
                return Err(TinylinkError::code_conflict(format!(
                    "Code '{}' already exists",
                    record.code
                )));
            }
            records.push(record);
            Ok(())
        })?;

        info!("Inserted link: {}", code);
        Ok(())
    }

    async fn update(&self, code: &str, patch: RecordPatch) -> Result<UrlRecord> {
        let updated = self.mutate(|records| {
            let idx = position_of(records, code)?;
            if let Some(new_code) = patch.rename_target(code)
                && records.iter().any(|r| r.code == new_code)
            {
                return Err(TinylinkError::code_conflict(format!(
                    "Code '{}' already exists",
                    new_code
                )));
            }
            patch.apply_to(&mut records[idx]);
            Ok(records[idx].clone())
        })?;

        info!("Updated link: {} -> {}", code, updated.code);
        Ok(updated)
    }

    async fn record_click(&self, code: &str, at: DateTime<Utc>) -> Result<UrlRecord> {
        self.mutate(|records| {
            let idx = position_of(records, code)?;
            let record = &mut records[idx];
            record.clicks = record.clicks.saturating_add(1);
            record.last_accessed = Some(at);
            Ok(record.clone())
        })
    }

    async fn remove(&self, code: &str) -> Result<UrlRecord> {
        let removed = self.mutate(|records| {
            let idx = position_of(records, code)?;
            Ok(records.remove(idx))
        })?;

        info!("Removed link with code: {}", code);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(code: &str) -> UrlRecord {
        UrlRecord::new(code, format!("https://{}.example.com", code), Utc::now())
    }

    #[test]
    fn test_new_creates_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("urls.json");

        FileStorage::new(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: Vec<UrlRecord> = serde_json::from_str(&content).unwrap();
        assert!(parsed.is_empty());
    }

    #[tokio::test]
    async fn test_insert_preserves_order_and_rejects_duplicates() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("urls.json")).unwrap();

        storage.insert(record("FIRST")).await.unwrap();
        storage.insert(record("SECOND")).await.unwrap();
        let err = storage.insert(record("FIRST")).await.unwrap_err();
        assert!(matches!(err, TinylinkError::CodeConflict(_)));

        let codes: Vec<String> = storage
            .load_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.code)
            .collect();
        assert_eq!(codes, vec!["FIRST", "SECOND"]);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_file_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("urls.json");
        let storage = FileStorage::new(&path).unwrap();
        storage.insert(record("KEEP")).await.unwrap();
        let before = fs::read_to_string(&path).unwrap();

        assert!(storage.remove("MISSING").await.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("urls.json");
        let storage = FileStorage::new(&path).unwrap();
        storage.insert(record("ONE")).await.unwrap();

        assert!(!dir.path().join("urls.json.tmp").exists());
    }
}
