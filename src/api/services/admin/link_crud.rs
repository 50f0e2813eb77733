//! Admin API 链接 CRUD 操作

use actix_web::{HttpResponse, Responder, web};
use tracing::{info, trace, warn};

use crate::services::Registry;

use super::error_code::ErrorCode;
use super::helpers::{created_response, error_from_tinylink, success_response};
use super::types::{LinkResponse, ListResponse, PostNewLink, UpdateLink};

/// 获取所有链接
pub async fn get_all_links(registry: web::Data<Registry>) -> impl Responder {
    trace!("Admin API: request to list all links");

    match registry.get_all().await {
        Ok(listing) => {
            let data: Vec<LinkResponse> = listing
                .records
                .into_iter()
                .map(|record| {
                    let short_url = registry.short_url(&record.code);
                    LinkResponse::new(record, short_url)
                })
                .collect();

            info!("Admin API: returning {} links", listing.total);
            HttpResponse::Ok()
                .append_header(("Content-Type", "application/json; charset=utf-8"))
                .json(ListResponse {
                    code: ErrorCode::Success,
                    data,
                    total: listing.total,
                })
        }
        Err(e) => {
            warn!("Admin API: failed to list links: {}", e);
            error_from_tinylink(&e)
        }
    }
}

pub async fn get_link(path: web::Path<String>, registry: web::Data<Registry>) -> impl Responder {
    let code = path.into_inner();
    trace!("Admin API: request to get link '{}'", code);

    match registry.get_one(&code).await {
        Ok(record) => {
            let short_url = registry.short_url(&record.code);
            success_response(LinkResponse::new(record, short_url))
        }
        Err(e) => error_from_tinylink(&e),
    }
}

pub async fn post_link(
    body: web::Json<PostNewLink>,
    registry: web::Data<Registry>,
) -> impl Responder {
    let body = body.into_inner();
    trace!("Admin API: request to create link -> {}", body.url);

    match registry.create(&body.url, body.code.as_deref()).await {
        Ok(created) => created_response(LinkResponse::new(created.record, created.short_url)),
        Err(e) => {
            info!("Admin API: create rejected: {}", e);
            error_from_tinylink(&e)
        }
    }
}

pub async fn update_link(
    path: web::Path<String>,
    body: web::Json<UpdateLink>,
    registry: web::Data<Registry>,
) -> impl Responder {
    let code = path.into_inner();
    let body = body.into_inner();
    trace!("Admin API: request to update link '{}'", code);

    match registry
        .update(&code, body.url.as_deref(), body.code.as_deref())
        .await
    {
        Ok(record) => {
            let short_url = registry.short_url(&record.code);
            success_response(LinkResponse::new(record, short_url))
        }
        Err(e) => {
            info!("Admin API: update of '{}' rejected: {}", code, e);
            error_from_tinylink(&e)
        }
    }
}

pub async fn delete_link(path: web::Path<String>, registry: web::Data<Registry>) -> impl Responder {
    let code = path.into_inner();
    trace!("Admin API: request to delete link '{}'", code);

    match registry.delete(&code).await {
        Ok(record) => {
            let short_url = registry.short_url(&record.code);
            success_response(LinkResponse::new(record, short_url))
        }
        Err(e) => error_from_tinylink(&e),
    }
}
