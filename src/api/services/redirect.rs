use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE, LOCATION, RETRY_AFTER};
use actix_web::{HttpResponse, web};
use tracing::{debug, error, warn};

use crate::config::get_config;
use crate::errors::{Result, ShortspaceError};
use crate::services::RedirectResolver;
use crate::storage::ResolvedLink;

pub struct RedirectService;

impl RedirectService {
    /// GET|HEAD /{code}
    pub async fn handle_redirect(
        path: web::Path<String>,
        resolver: web::Data<Arc<RedirectResolver>>,
    ) -> HttpResponse {
        let code = path.into_inner();
        Self::finish(resolver.resolve(&code).await)
    }

    /// GET|HEAD /{owner_id}/{code}
    pub async fn handle_scoped_redirect(
        path: web::Path<(String, String)>,
        resolver: web::Data<Arc<RedirectResolver>>,
    ) -> HttpResponse {
        let (owner_id, code) = path.into_inner();
        Self::finish(resolver.resolve_scoped(&owner_id, &code).await)
    }

    fn finish(result: Result<ResolvedLink>) -> HttpResponse {
        match result {
            Ok(link) => {
                let status = get_config().links.redirect_status.status_code();
                HttpResponse::build(status)
                    .insert_header((LOCATION, link.original_url))
                    .insert_header((CACHE_CONTROL, "no-store"))
                    .finish()
            }
            Err(ShortspaceError::NotFound(msg)) => {
                debug!("{}", msg);
                Self::not_found_response()
            }
            Err(e) if e.is_transient() => {
                warn!("Redirect lookup unavailable: {}", e);
                Self::plain(StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable")
            }
            Err(e) => {
                error!("Redirect lookup failed: {}", e);
                Self::plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        Self::plain(StatusCode::NOT_FOUND, "Not Found")
    }

    #[inline]
    fn plain(status: StatusCode, body: &'static str) -> HttpResponse {
        let mut builder = HttpResponse::build(status);
        builder
            .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
            .insert_header((CACHE_CONTROL, "no-store"));
        if status == StatusCode::SERVICE_UNAVAILABLE {
            builder.insert_header((RETRY_AFTER, "1"));
        }
        builder.body(body)
    }
}

/// 跳转路由，必须最后注册
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("")
        .route(
            "/{owner_id}/{code}",
            web::get().to(RedirectService::handle_scoped_redirect),
        )
        .route(
            "/{owner_id}/{code}",
            web::head().to(RedirectService::handle_scoped_redirect),
        )
        .route("/{code}", web::get().to(RedirectService::handle_redirect))
        .route("/{code}", web::head().to(RedirectService::handle_redirect))
}
