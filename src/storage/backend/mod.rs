//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.
//!
//! Uniqueness of codes is enforced by the primary key; the backend maps
//! unique-constraint violations to `CodeConflict` instead of checking first.

mod connection;
mod converters;
mod mutations;
mod query;
mod retry;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use tracing::info;

use super::{RecordPatch, Storage, UrlRecord};
use crate::errors::{Result, TinylinkError};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_record, record_to_active_model};
pub use retry::RetryConfig;

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<&'static str> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
    {
        Ok("sqlite")
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql")
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres")
    } else {
        Err(TinylinkError::config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// Primary-key collisions surface as unique constraint violations
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: &'static str,
    retry_config: RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, pool_size: u32) -> Result<Self> {
        if database_url.is_empty() {
            return Err(TinylinkError::config("storage.database_url is not set"));
        }

        let backend_name = infer_backend_from_url(database_url)?;

        // 根据不同数据库类型配置连接选项
        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name, pool_size).await?
        };

        run_migrations(&db).await?;

        info!("{} Storage initialized.", backend_name.to_uppercase());
        Ok(SeaOrmStorage {
            db,
            backend_name,
            retry_config: RetryConfig::default(),
        })
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }
}

#[async_trait]
impl Storage for SeaOrmStorage {
    fn backend_name(&self) -> &'static str {
        self.backend_name
    }

    async fn load_all(&self) -> Result<Vec<UrlRecord>> {
        self.load_records().await
    }

    async fn get(&self, code: &str) -> Result<Option<UrlRecord>> {
        self.find_record(code).await
    }

    async fn insert(&self, record: UrlRecord) -> Result<()> {
        self.insert_record(&record).await
    }

    async fn update(&self, code: &str, patch: RecordPatch) -> Result<UrlRecord> {
        self.update_record(code, &patch).await
    }

    async fn record_click(&self, code: &str, at: DateTime<Utc>) -> Result<UrlRecord> {
        self.increment_clicks(code, at).await
    }

    async fn remove(&self, code: &str) -> Result<UrlRecord> {
        self.delete_record(code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend() {
        assert_eq!(infer_backend_from_url("sqlite://urls.db?mode=rwc").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("data/urls.sqlite").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("mariadb://u:p@h/db").unwrap(), "mysql");
        assert_eq!(
            infer_backend_from_url("postgresql://u:p@h/db").unwrap(),
            "postgres"
        );
    }

    #[test]
    fn test_infer_backend_unknown_scheme() {
        assert!(matches!(
            infer_backend_from_url("mongodb://localhost"),
            Err(TinylinkError::Config(_))
        ));
    }
}
