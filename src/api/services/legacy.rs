//! `POST /new?url=…&auth=…`
//!
//! Query-string endpoint kept for screenshot/upload tools (ShareX style)
//! that can only fill in a URL template. Authenticated by the `auth`
//! parameter through the same middleware as the admin API.

use actix_web::{HttpResponse, Responder, guard, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::admin::error_from_tinylink;
use crate::services::Registry;

#[derive(Debug, Deserialize)]
pub struct NewLinkQuery {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewLinkResponse {
    pub url: String,
}

pub async fn create_short_link(
    query: web::Query<NewLinkQuery>,
    registry: web::Data<Registry>,
) -> impl Responder {
    match registry.create(&query.url, None).await {
        Ok(created) => {
            info!("Legacy API: created {}", created.short_url);
            HttpResponse::Ok().json(NewLinkResponse {
                url: created.short_url,
            })
        }
        Err(e) => error_from_tinylink(&e),
    }
}

/// Only POST is claimed; other methods fall through to the redirect routes
pub fn legacy_routes() -> actix_web::Resource {
    web::resource("/new")
        .guard(guard::Post())
        .route(web::post().to(create_short_link))
}
