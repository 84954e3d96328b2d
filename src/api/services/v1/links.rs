//! 链接管理端点

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use tracing::trace;

use crate::config::get_config;
use crate::services::{CreateLinkRequest, Identity, LinkService};

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_from_shortspace, json_response};
use super::types::{DeletePayload, LinkView, LinksPayload, ShortenBody};

fn public_base_url() -> String {
    get_config().links.public_base_url.clone()
}

fn identity_ref(identity: &Option<web::ReqData<Identity>>) -> Option<&Identity> {
    identity.as_ref().map(|data| &**data)
}

/// POST /api/links
pub async fn post_link(
    identity: Option<web::ReqData<Identity>>,
    body: web::Json<ShortenBody>,
    links: web::Data<Arc<LinkService>>,
) -> HttpResponse {
    let body = body.into_inner();
    let req = CreateLinkRequest {
        url: body.url,
        custom_code: body.code,
    };

    match links.create_link(identity_ref(&identity), req).await {
        Ok(result) => {
            let view = LinkView::from_record(result.link, &public_base_url());
            if result.created {
                json_response(
                    StatusCode::CREATED,
                    ErrorCode::Success,
                    "Short URL created",
                    Some(view),
                )
            } else {
                json_response(
                    StatusCode::OK,
                    ErrorCode::Success,
                    "URL already shortened",
                    Some(view),
                )
            }
        }
        Err(e) => error_from_shortspace(&e),
    }
}

/// GET /api/links
pub async fn get_all_links(
    identity: Option<web::ReqData<Identity>>,
    links: web::Data<Arc<LinkService>>,
) -> HttpResponse {
    let base = public_base_url();
    let result = links
        .list_links(identity_ref(&identity))
        .await
        .map(|listing| LinksPayload {
            links: listing
                .links
                .into_iter()
                .map(|link| LinkView::from_record(link, &base))
                .collect(),
            stats: listing.stats,
        });
    api_result(result)
}

/// DELETE /api/links/{code}
pub async fn delete_link(
    identity: Option<web::ReqData<Identity>>,
    path: web::Path<String>,
    links: web::Data<Arc<LinkService>>,
) -> HttpResponse {
    let code = path.into_inner();
    trace!("Delete requested for '{}'", code);

    let result = links
        .delete_link(identity_ref(&identity), &code)
        .await
        .map(|outcome| DeletePayload {
            deleted: LinkView::from_record(outcome.deleted, &public_base_url()),
            stats: outcome.stats,
        });
    api_result(result)
}

/// GET /api/stats
pub async fn get_stats(
    identity: Option<web::ReqData<Identity>>,
    links: web::Data<Arc<LinkService>>,
) -> HttpResponse {
    api_result(links.stats(identity_ref(&identity)).await)
}
