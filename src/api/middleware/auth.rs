use actix_web::middleware::Next;
use actix_web::{
    Error, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, header::CONTENT_TYPE},
    web,
};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::{debug, info};

use crate::api::services::admin::{ApiResponse, ErrorCode};

/// Shared secret for the admin API and the legacy `/new` endpoint
///
/// An empty token disables both.
#[derive(Debug, Clone, Default)]
pub struct AdminToken(String);

impl AdminToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn is_disabled(&self) -> bool {
        self.0.is_empty()
    }

    /// 常量时间比较，避免通过响应耗时猜测 token
    pub fn matches(&self, candidate: &str) -> bool {
        !self.is_disabled() && bool::from(self.0.as_bytes().ct_eq(candidate.as_bytes()))
    }
}

#[derive(Deserialize)]
struct AuthQuery {
    auth: Option<String>,
}

pub struct AdminAuth;

impl AdminAuth {
    /// Admin API 身份验证中间件
    pub async fn admin_auth(
        req: ServiceRequest,
        next: Next<BoxBody>,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        if req.method() == Method::OPTIONS {
            // 对于 OPTIONS 请求，直接返回 204 No Content
            return Ok(req.into_response(
                HttpResponse::NoContent()
                    .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                    .finish(),
            ));
        }

        let admin_token = req
            .app_data::<web::Data<AdminToken>>()
            .map(|data| data.get_ref().clone())
            .unwrap_or_default();

        // 如果 token 为空，认为 Admin API 被禁用
        if admin_token.is_disabled() {
            debug!("Admin token not configured - returning 404");
            return Ok(req.into_response(
                HttpResponse::NotFound()
                    .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                    .body("Not Found"),
            ));
        }

        if Self::extract_token(&req).is_some_and(|token| admin_token.matches(&token)) {
            debug!("Admin API authentication succeeded");
            return next.call(req).await;
        }

        info!("Admin API authentication failed: invalid or missing token");
        Ok(req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::Unauthorized,
                    message: "Unauthorized: Invalid or missing token".to_string(),
                    data: None,
                }),
        ))
    }

    /// `Authorization: Bearer <token>`, falling back to the `auth` query parameter
    fn extract_token(req: &ServiceRequest) -> Option<String> {
        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string());

        bearer.or_else(|| {
            web::Query::<AuthQuery>::from_query(req.query_string())
                .ok()
                .and_then(|q| q.into_inner().auth)
        })
    }
}
