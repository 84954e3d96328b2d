//! Server mode
//!
//! Builds the shared services once, then starts one actix app per worker.
//! Route order matters: health and `/api` are registered before the
//! catch-all redirect scope.

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::DefaultHeaders, web};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::middleware::BearerAuth;
use crate::api::services::v1::{AuthLimiterConfig, api_routes, auth_rate_limit_config, json_config};
use crate::api::services::{AppStartTime, health_routes, redirect_routes};
use crate::config::CorsConfig;
use crate::runtime::lifetime::{self, startup::StartupContext};

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors_config: &CorsConfig) {
    if cors_config.enabled && cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
            No cross-origin requests will be allowed. \
            Set allowed_origins explicitly or use '[\"*\"]' for any origin."
        );
    }
}

/// Build CORS middleware from configuration
fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    // 未启用时保持浏览器同源策略
    if !cors_config.enabled {
        return Cors::default();
    }

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allowed_header(actix_web::http::header::AUTHORIZATION)
        .allowed_header(actix_web::http::header::CONTENT_TYPE)
        .allowed_header(actix_web::http::header::ACCEPT)
        .max_age(cors_config.max_age);

    if cors_config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// 注册共享数据和全部路由
///
/// 测试里也用它搭建同样的 app
pub fn configure_app(
    cfg: &mut web::ServiceConfig,
    ctx: &StartupContext,
    limiter: &AuthLimiterConfig,
    start_time: &AppStartTime,
) {
    let bearer = BearerAuth::new(ctx.jwt.clone());

    cfg.app_data(json_config())
        .app_data(web::Data::new(ctx.storage.clone()))
        .app_data(web::Data::new(ctx.link_service.clone()))
        .app_data(web::Data::new(ctx.user_service.clone()))
        .app_data(web::Data::new(ctx.resolver.clone()))
        .app_data(web::Data::new(start_time.clone()))
        .app_data(web::PayloadConfig::new(64 * 1024))
        .service(health_routes())
        .service(api_routes(limiter, bearer))
        .service(redirect_routes());
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime::now();

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let config = crate::config::get_config();

    // 限流器状态需要跨 worker 共享，只构建一次
    let limiter = auth_rate_limit_config(&config.auth).context("Invalid login rate limit")?;

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let storage_for_shutdown = startup.storage.clone();
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors_middleware(&cors_config))
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .configure(|cfg| configure_app(cfg, &startup, &limiter, &app_start_time))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(storage_for_shutdown) => {
            warn!("Graceful shutdown: storage closed");
        }
    }

    Ok(())
}
