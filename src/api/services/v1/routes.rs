//! API v1 路由配置

use actix_governor::Governor;
use actix_web::dev::HttpServiceFactory;
use actix_web::web;

use crate::api::middleware::BearerAuth;

use super::auth::{AuthLimiterConfig, login, signup, verify};
use super::links::{delete_link, get_all_links, get_stats, post_link};

/// 认证路由 `/auth`
///
/// - POST /auth/signup - 注册（带限流）
/// - POST /auth/login - 登录（带限流）
/// - GET /auth/verify - 验证 token
pub fn auth_routes(limiter: &AuthLimiterConfig, bearer: BearerAuth) -> actix_web::Scope {
    web::scope("/auth")
        .route("/signup", web::post().to(signup).wrap(Governor::new(limiter)))
        .route("/login", web::post().to(login).wrap(Governor::new(limiter)))
        .service(
            web::resource("/verify")
                .wrap(bearer)
                .route(web::get().to(verify)),
        )
}

/// 链接管理路由 `/links`
pub fn links_routes(bearer: BearerAuth) -> impl HttpServiceFactory {
    web::scope("/links")
        .wrap(bearer)
        .route("", web::get().to(get_all_links))
        .route("", web::post().to(post_link))
        .route("/{code}", web::delete().to(delete_link))
}

/// 统计路由 `/stats`
pub fn stats_routes(bearer: BearerAuth) -> impl HttpServiceFactory {
    web::scope("/stats")
        .wrap(bearer)
        .route("", web::get().to(get_stats))
}

/// `/api` 下的全部路由
pub fn api_routes(limiter: &AuthLimiterConfig, bearer: BearerAuth) -> actix_web::Scope {
    web::scope("/api")
        .service(auth_routes(limiter, bearer.clone()))
        .service(links_routes(bearer.clone()))
        .service(stats_routes(bearer))
}
