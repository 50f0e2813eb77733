//! Persistence backends for URL records
//!
//! The registry talks to storage only through the [`Storage`] trait. Every
//! mutating method is atomic with respect to other callers of the same
//! backend, so uniqueness of codes and click counts hold under concurrent
//! requests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::errors::Result;

pub mod backend;
pub mod file;
pub mod models;

pub use backend::{RetryConfig, SeaOrmStorage};
pub use file::FileStorage;
pub use models::{RecordPatch, UrlRecord};

#[async_trait]
pub trait Storage: Send + Sync {
    fn backend_name(&self) -> &'static str;

    /// All live records, oldest first
    async fn load_all(&self) -> Result<Vec<UrlRecord>>;

    async fn get(&self, code: &str) -> Result<Option<UrlRecord>>;

    async fn contains(&self, code: &str) -> Result<bool> {
        Ok(self.get(code).await?.is_some())
    }

    /// Insert if absent; `CodeConflict` when the code is already live
    async fn insert(&self, record: UrlRecord) -> Result<()>;

    /// Apply `patch` to the record stored under `code`
    ///
    /// `NotFound` if `code` is absent, `CodeConflict` if the patch renames
    /// onto a code held by another record.
    async fn update(&self, code: &str, patch: RecordPatch) -> Result<UrlRecord>;

    /// Increment `clicks` and stamp `last_accessed`
    async fn record_click(&self, code: &str, at: DateTime<Utc>) -> Result<UrlRecord>;

    /// Remove and return the record
    async fn remove(&self, code: &str) -> Result<UrlRecord>;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &StorageConfig) -> Result<Arc<dyn Storage>> {
        let storage: Arc<dyn Storage> = match config.backend {
            StorageBackend::File => Arc::new(FileStorage::new(&config.file_path)?),
            StorageBackend::Database => Arc::new(
                SeaOrmStorage::new(&config.database_url, config.pool_size)
                    .await?
                    .with_retry_config(RetryConfig::from(config)),
            ),
        };

        info!(
            "Using {} storage backend ({})",
            config.backend,
            storage.backend_name()
        );
        Ok(storage)
    }
}
