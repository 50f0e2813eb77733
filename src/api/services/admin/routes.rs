//! Admin API 路由配置

use actix_web::web;

use super::helpers::json_error_handler;
use super::link_crud::{delete_link, get_all_links, get_link, post_link, update_link};

/// 链接管理路由，挂载在 `{admin_prefix}/link` 下（鉴权中间件由调用方包裹）
///
/// 包含：
/// - GET/HEAD /link - 获取所有链接
/// - POST /link - 创建链接
/// - GET/HEAD /link/{code} - 获取单个链接
/// - PUT /link/{code} - 更新链接
/// - DELETE /link/{code} - 删除链接
///
/// 只挂载 `/link` 子路径，裸的 `{admin_prefix}` 交给重定向路由按保留字返回 404
pub fn admin_routes(admin_prefix: &str) -> actix_web::Scope {
    web::scope(&format!("{}/link", admin_prefix.trim_end_matches('/')))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("", web::get().to(get_all_links))
        .route("", web::head().to(get_all_links))
        .route("", web::post().to(post_link))
        .route("/{code}", web::get().to(get_link))
        .route("/{code}", web::head().to(get_link))
        .route("/{code}", web::put().to(update_link))
        .route("/{code}", web::delete().to(delete_link))
}
