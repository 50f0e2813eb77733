use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TinylinkError {
    BadRequest(String),
    Unauthorized(String),
    ReservedCode(String),
    CodeConflict(String),
    NotFound(String),
    GenerationExhausted(String),
    StorageFailure(String),
    Config(String),
}

impl TinylinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            TinylinkError::BadRequest(_) => "E001",
            TinylinkError::Unauthorized(_) => "E002",
            TinylinkError::ReservedCode(_) => "E003",
            TinylinkError::CodeConflict(_) => "E004",
            TinylinkError::NotFound(_) => "E005",
            TinylinkError::GenerationExhausted(_) => "E006",
            TinylinkError::StorageFailure(_) => "E007",
            TinylinkError::Config(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            TinylinkError::BadRequest(_) => "Bad Request",
            TinylinkError::Unauthorized(_) => "Unauthorized",
            TinylinkError::ReservedCode(_) => "Reserved Code",
            TinylinkError::CodeConflict(_) => "Code Conflict",
            TinylinkError::NotFound(_) => "Resource Not Found",
            TinylinkError::GenerationExhausted(_) => "Code Generation Exhausted",
            TinylinkError::StorageFailure(_) => "Storage Failure",
            TinylinkError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            TinylinkError::BadRequest(msg)
            | TinylinkError::Unauthorized(msg)
            | TinylinkError::ReservedCode(msg)
            | TinylinkError::CodeConflict(msg)
            | TinylinkError::NotFound(msg)
            | TinylinkError::GenerationExhausted(msg)
            | TinylinkError::StorageFailure(msg)
            | TinylinkError::Config(msg) => msg,
        }
    }

    /// HTTP status the request layer answers with for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            TinylinkError::BadRequest(_) | TinylinkError::ReservedCode(_) => {
                StatusCode::BAD_REQUEST
            }
            TinylinkError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            TinylinkError::CodeConflict(_) => StatusCode::CONFLICT,
            TinylinkError::NotFound(_) => StatusCode::NOT_FOUND,
            TinylinkError::GenerationExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            TinylinkError::StorageFailure(_) | TinylinkError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 格式化为彩色输出（用于启动失败时的终端输出）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for TinylinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TinylinkError {}

// 便捷的构造函数
impl TinylinkError {
    pub fn bad_request<T: Into<String>>(msg: T) -> Self {
        TinylinkError::BadRequest(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        TinylinkError::Unauthorized(msg.into())
    }

    pub fn reserved_code<T: Into<String>>(msg: T) -> Self {
        TinylinkError::ReservedCode(msg.into())
    }

    pub fn code_conflict<T: Into<String>>(msg: T) -> Self {
        TinylinkError::CodeConflict(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        TinylinkError::NotFound(msg.into())
    }

    pub fn generation_exhausted<T: Into<String>>(msg: T) -> Self {
        TinylinkError::GenerationExhausted(msg.into())
    }

    pub fn storage_failure<T: Into<String>>(msg: T) -> Self {
        TinylinkError::StorageFailure(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        TinylinkError::Config(msg.into())
    }
}

impl From<sea_orm::DbErr> for TinylinkError {
    fn from(err: sea_orm::DbErr) -> Self {
        TinylinkError::StorageFailure(err.to_string())
    }
}

impl From<std::io::Error> for TinylinkError {
    fn from(err: std::io::Error) -> Self {
        TinylinkError::StorageFailure(err.to_string())
    }
}

impl From<serde_json::Error> for TinylinkError {
    fn from(err: serde_json::Error) -> Self {
        TinylinkError::StorageFailure(err.to_string())
    }
}

impl From<config::ConfigError> for TinylinkError {
    fn from(err: config::ConfigError) -> Self {
        TinylinkError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TinylinkError>;
