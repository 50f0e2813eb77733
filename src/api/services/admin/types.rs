//! Admin API 类型定义

use serde::{Deserialize, Serialize};

use super::error_code::ErrorCode;
use crate::storage::UrlRecord;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: ErrorCode,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ListResponse<T> {
    pub code: ErrorCode,
    pub data: T,
    pub total: usize,
}

/// `POST {admin_prefix}/link`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PostNewLink {
    pub url: String,
    pub code: Option<String>,
}

/// `PUT {admin_prefix}/link/{code}`; omitted fields stay as they are
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UpdateLink {
    pub url: Option<String>,
    pub code: Option<String>,
}

/// 对外暴露的链接结构，时间统一为 RFC3339
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LinkResponse {
    pub code: String,
    pub url: String,
    pub short_url: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub last_accessed: Option<String>,
    pub clicks: u64,
}

impl LinkResponse {
    pub fn new(record: UrlRecord, short_url: String) -> Self {
        Self {
            short_url,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.map(|t| t.to_rfc3339()),
            last_accessed: record.last_accessed.map(|t| t.to_rfc3339()),
            clicks: record.clicks,
            code: record.code,
            url: record.url,
        }
    }
}
