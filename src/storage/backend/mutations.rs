//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations. Multi-statement
//! changes run inside a transaction, and every write goes through
//! [`with_retry`] so lock conflicts rerun the whole unit instead of failing.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ActiveValue::Unchanged, ColumnTrait, DbErr, EntityTrait,
    ExprTrait, QueryFilter, TransactionTrait,
};
use tracing::info;

use super::converters::{model_to_record, record_to_active_model};
use super::retry::with_retry;
use super::{SeaOrmStorage, is_unique_violation};
use crate::errors::{Result, TinylinkError};
use crate::storage::{RecordPatch, UrlRecord};

use migration::entities::url_record;

fn conflict_or_failure(err: DbErr, code: &str) -> TinylinkError {
    if is_unique_violation(&err) {
        TinylinkError::code_conflict(format!("Code '{}' already exists", code))
    } else {
        TinylinkError::storage_failure(format!("Failed to write link '{}': {}", code, err))
    }
}

fn not_found(code: &str) -> TinylinkError {
    TinylinkError::not_found(format!("Link '{}' not found", code))
}

impl SeaOrmStorage {
    pub async fn insert_record(&self, record: &UrlRecord) -> Result<()> {
        with_retry(&format!("insert({})", record.code), self.retry_config, || async {
            url_record::Entity::insert(record_to_active_model(record))
                .exec(&self.db)
                .await
                .map(|_| ())
        })
        .await
        .map_err(|e| conflict_or_failure(e, &record.code))?;

        info!("Short link inserted: {}", record.code);
        Ok(())
    }

    pub async fn update_record(&self, code: &str, patch: &RecordPatch) -> Result<UrlRecord> {
        let target = patch.rename_target(code).unwrap_or(code);

        let record = with_retry(&format!("update({})", code), self.retry_config, || {
            self.try_update(code, patch)
        })
        .await
        .map_err(|e| conflict_or_failure(e, target))?
        .ok_or_else(|| not_found(code))?;

        info!("Short link updated: {} -> {}", code, record.code);
        Ok(record)
    }

    /// One update attempt; `Ok(None)` when the code does not exist
    async fn try_update(
        &self,
        code: &str,
        patch: &RecordPatch,
    ) -> std::result::Result<Option<UrlRecord>, DbErr> {
        let txn = self.db.begin().await?;

        let Some(existing) = url_record::Entity::find_by_id(code.to_string())
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let mut record = model_to_record(existing);
        patch.apply_to(&mut record);

        if patch.rename_target(code).is_some() {
            // 主键变更：先插入新行（冲突即失败），再删除旧行
            url_record::Entity::insert(record_to_active_model(&record))
                .exec(&txn)
                .await?;
            url_record::Entity::delete_by_id(code.to_string())
                .exec(&txn)
                .await?;
        } else {
            url_record::ActiveModel {
                code: Unchanged(code.to_string()),
                url: Set(record.url.clone()),
                updated_at: Set(record.updated_at),
                ..Default::default()
            }
            .update(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(Some(record))
    }

    pub async fn increment_clicks(&self, code: &str, at: DateTime<Utc>) -> Result<UrlRecord> {
        let model = with_retry(&format!("click({})", code), self.retry_config, || {
            self.try_increment_clicks(code, at)
        })
        .await?
        .ok_or_else(|| not_found(code))?;

        Ok(model_to_record(model))
    }

    async fn try_increment_clicks(
        &self,
        code: &str,
        at: DateTime<Utc>,
    ) -> std::result::Result<Option<url_record::Model>, DbErr> {
        let txn = self.db.begin().await?;

        // 单条 UPDATE 原子自增，避免并发丢失点击
        let result = url_record::Entity::update_many()
            .col_expr(
                url_record::Column::Clicks,
                Expr::col(url_record::Column::Clicks).add(Expr::val(1i64)),
            )
            .col_expr(url_record::Column::LastAccessed, Expr::val(at))
            .filter(url_record::Column::Code.eq(code))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let model = url_record::Entity::find_by_id(code.to_string())
            .one(&txn)
            .await?;

        txn.commit().await?;
        Ok(model)
    }

    pub async fn delete_record(&self, code: &str) -> Result<UrlRecord> {
        let model = with_retry(&format!("remove({})", code), self.retry_config, || {
            self.try_delete(code)
        })
        .await?
        .ok_or_else(|| not_found(code))?;

        info!("Short link deleted: {}", code);
        Ok(model_to_record(model))
    }

    async fn try_delete(&self, code: &str) -> std::result::Result<Option<url_record::Model>, DbErr> {
        let txn = self.db.begin().await?;

        let Some(existing) = url_record::Entity::find_by_id(code.to_string())
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        url_record::Entity::delete_by_id(code.to_string())
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(Some(existing))
    }
}
