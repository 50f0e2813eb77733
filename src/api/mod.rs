//! HTTP request layer
//!
//! Thin actix-web handlers over [`Registry`](crate::services::Registry).
//! The app must provide `web::Data<Registry>` and `web::Data<AdminToken>`.

pub mod middleware;
pub mod services;

use actix_web::middleware::from_fn;
use actix_web::web;

use middleware::AdminAuth;
use services::{admin_routes, legacy_routes, redirect_routes};

pub use middleware::AdminToken;

/// Mount every route; the catch-all redirect scope goes last
pub fn configure(cfg: &mut web::ServiceConfig, admin_prefix: &str) {
    let admin_prefix = format!("/{}", admin_prefix.trim_matches('/'));

    cfg.service(admin_routes(&admin_prefix).wrap(from_fn(AdminAuth::admin_auth)))
        .service(legacy_routes().wrap(from_fn(AdminAuth::admin_auth)))
        .service(redirect_routes());
}
