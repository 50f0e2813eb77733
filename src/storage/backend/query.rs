//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{EntityTrait, QueryOrder};
use tracing::{debug, error};

use super::SeaOrmStorage;
use super::converters::model_to_record;
use crate::errors::{Result, TinylinkError};
use crate::storage::UrlRecord;

use migration::entities::url_record;

impl SeaOrmStorage {
    pub async fn find_record(&self, code: &str) -> Result<Option<UrlRecord>> {
        let model = url_record::Entity::find_by_id(code.to_string())
            .one(&self.db)
            .await
            .map_err(|e| {
                error!("查询短链接失败: {}", e);
                TinylinkError::storage_failure(format!("Failed to load link '{}': {}", code, e))
            })?;

        Ok(model.map(model_to_record))
    }

    pub async fn load_records(&self) -> Result<Vec<UrlRecord>> {
        let models = url_record::Entity::find()
            .order_by_asc(url_record::Column::CreatedAt)
            .order_by_asc(url_record::Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| {
                error!("加载所有短链接失败: {}", e);
                TinylinkError::storage_failure(format!("Failed to load links: {}", e))
            })?;

        debug!("Loaded {} records", models.len());
        Ok(models.into_iter().map(model_to_record).collect())
    }
}
