//! Admin API 服务模块
//!
//! 链接 CRUD 端点，全部经过 [`AdminAuth`](crate::api::middleware::AdminAuth) 鉴权。

pub mod error_code;
mod helpers;
mod link_crud;
pub mod routes;
mod types;

// 重新导出类型
pub use types::*;

// 重新导出帮助函数
pub use helpers::{error_from_tinylink, error_response, json_response, success_response};

// 重新导出错误码
pub use error_code::ErrorCode;

// 重新导出链接 CRUD 端点
pub use link_crud::{delete_link, get_all_links, get_link, post_link, update_link};
