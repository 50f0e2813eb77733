//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::TinylinkError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 链接错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    InternalServerError = 1005,

    // 链接错误 3000-3099
    LinkNotFound = 3000,
    LinkAlreadyExists = 3001,
    LinkDatabaseError = 3005,
    LinkReservedCode = 3007,
    LinkCodeExhausted = 3008,
}

impl From<&TinylinkError> for ErrorCode {
    fn from(err: &TinylinkError) -> Self {
        match err {
            TinylinkError::BadRequest(_) => ErrorCode::BadRequest,
            TinylinkError::Unauthorized(_) => ErrorCode::Unauthorized,
            TinylinkError::ReservedCode(_) => ErrorCode::LinkReservedCode,
            TinylinkError::CodeConflict(_) => ErrorCode::LinkAlreadyExists,
            TinylinkError::NotFound(_) => ErrorCode::LinkNotFound,
            TinylinkError::GenerationExhausted(_) => ErrorCode::LinkCodeExhausted,
            TinylinkError::StorageFailure(_) => ErrorCode::LinkDatabaseError,
            TinylinkError::Config(_) => ErrorCode::InternalServerError,
        }
    }
}
