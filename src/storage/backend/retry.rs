//! 数据库写操作重试
//!
//! SQLite 在 WAL 模式下，读快照过期的事务升级为写事务时会立即返回
//! BUSY_SNAPSHOT（busy_timeout 不生效）；MySQL 死锁和 PostgreSQL 序列化失败
//! 同样需要整体重跑事务。这里只重试这类瞬时冲突，其余错误原样返回。

use std::future::Future;
use std::ops::Deref;
use std::time::Duration;

use sea_orm::DbErr;
use sea_orm::error::RuntimeErr;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::StorageConfig;

/// 判断数据库错误是否可重试
pub fn is_retryable_error(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
        DbErr::Exec(runtime_err) | DbErr::Query(runtime_err) => {
            is_retryable_runtime_error(runtime_err)
        }
        _ => false,
    }
}

fn is_retryable_runtime_error(err: &RuntimeErr) -> bool {
    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            if let Some(db_err) = sqlx_err.deref().as_database_error()
                && let Some(code) = db_err.code()
            {
                return is_retryable_code(code.as_ref());
            }
            is_retryable_error_message(&sqlx_err.to_string().to_lowercase())
        }
        RuntimeErr::Internal(msg) => is_retryable_error_message(&msg.to_lowercase()),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

/// 按数据库错误码识别瞬时冲突
///
/// sqlx 对 SQLite 返回扩展错误码，BUSY/LOCKED 的各个变体都要列出。
fn is_retryable_code(code: &str) -> bool {
    matches!(
        code,
        // MySQL 死锁和锁等待超时
        "1213" | "1205" |
        // PostgreSQL 序列化失败和死锁
        "40001" | "40P01" |
        // SQLite BUSY, BUSY_RECOVERY, BUSY_SNAPSHOT, BUSY_TIMEOUT
        "5" | "261" | "517" | "773" |
        // SQLite LOCKED, LOCKED_SHAREDCACHE, LOCKED_VTAB
        "6" | "262" | "518"
    )
}

/// 错误码不可用时按消息匹配
fn is_retryable_error_message(err_str: &str) -> bool {
    err_str.contains("deadlock")
        || err_str.contains("lock wait timeout")
        || err_str.contains("database is locked")
        || err_str.contains("database table is locked")
        || err_str.contains("serialization failure")
}

#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&StorageConfig::default())
    }
}

impl From<&StorageConfig> for RetryConfig {
    fn from(config: &StorageConfig) -> Self {
        Self {
            max_retries: config.retry_count,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }
}

/// 指数退避 + 随机抖动重跑 `operation`
///
/// `operation` 每次调用都必须从头开始（包括重新开启事务）。
pub async fn with_retry<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    mut operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(
                        "Operation '{}' succeeded after {} retries",
                        operation_name, attempt
                    );
                }
                return Ok(value);
            }
            Err(e) if is_retryable_error(&e) && attempt < config.max_retries => {
                attempt += 1;
                let delay = calculate_backoff(attempt, config.base_delay_ms, config.max_delay_ms);
                warn!(
                    "Operation '{}' hit a transient conflict (attempt {}/{}): {}; retrying in {} ms",
                    operation_name,
                    attempt,
                    config.max_retries + 1,
                    e,
                    delay
                );
                sleep(Duration::from_millis(delay)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> u64 {
    let exp_delay = base_ms.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
    let capped = exp_delay.min(max_ms);
    // 0-25% 抖动，避免同时失败的事务同时重来
    let jitter = rand::random_range(0..=capped / 4);
    capped.saturating_add(jitter)
}
