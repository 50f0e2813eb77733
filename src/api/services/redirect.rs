use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, error, trace};

use crate::errors::TinylinkError;
use crate::services::{Lookup, Registry};

pub struct RedirectService {}

impl RedirectService {
    /// `GET /` 跳转到默认页面
    pub async fn handle_root(registry: web::Data<Registry>) -> impl Responder {
        HttpResponse::TemporaryRedirect()
            .insert_header(("Location", registry.default_url()))
            .finish()
    }

    pub async fn handle_redirect(
        path: web::Path<String>,
        registry: web::Data<Registry>,
    ) -> impl Responder {
        let code = path.into_inner();

        match registry.redirect_lookup(&code).await {
            Ok(Lookup::Redirect(url)) => {
                trace!("Redirecting {} -> {}", code, url);
                HttpResponse::TemporaryRedirect()
                    .insert_header(("Location", url))
                    .finish()
            }
            Ok(Lookup::NoContent) => HttpResponse::NoContent().finish(),
            Ok(Lookup::Reserved) => {
                trace!("Reserved path requested as short code: {}", code);
                Self::not_found_response()
            }
            Err(TinylinkError::NotFound(_)) => {
                debug!("Redirect link not found: {}", code);
                Self::not_found_response()
            }
            Err(e @ TinylinkError::BadRequest(_)) => {
                debug!("Rejected redirect lookup '{}': {}", code, e);
                Self::text_response(StatusCode::BAD_REQUEST, "Bad Request")
            }
            Err(e) => {
                error!("Storage error during redirect lookup: {}", e);
                Self::text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        Self::text_response(StatusCode::NOT_FOUND, "Not Found")
    }

    #[inline]
    fn text_response(status: StatusCode, body: &'static str) -> HttpResponse {
        HttpResponse::build(status)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body(body)
    }
}

pub fn redirect_routes() -> actix_web::Scope {
    web::scope("")
        .route("/", web::get().to(RedirectService::handle_root))
        .route("/", web::head().to(RedirectService::handle_root))
        .route("/{code}", web::get().to(RedirectService::handle_redirect))
        .route("/{code}", web::head().to(RedirectService::handle_redirect))
}
