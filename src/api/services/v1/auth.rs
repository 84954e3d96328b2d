//! 注册、登录与 token 验证端点

use std::sync::Arc;

use actix_governor::{GovernorConfig, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use governor::middleware::NoOpMiddleware;
use serde_json::json;
use tracing::debug;

use crate::config::AuthConfig;
use crate::errors::ShortspaceError;
use crate::services::{Identity, SignupRequest, UserService};

use super::error_code::ErrorCode;
use super::helpers::{error_from_shortspace, json_response, success_response};
use super::types::{LoginBody, SignupBody};

/// 基于连接 IP 的限流 key 提取器
#[derive(Clone, Copy)]
pub struct LoginKeyExtractor;

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        // TCP peer address，客户端无法伪造
        req.connection_info()
            .peer_addr()
            .map(str::to_string)
            .ok_or_else(|| SimpleKeyExtractionError::new("Unable to extract peer IP"))
    }
}

pub type AuthLimiterConfig = GovernorConfig<LoginKeyExtractor, NoOpMiddleware>;

/// 创建登录/注册限流配置
///
/// 配置在所有 worker 之间共享，同一个 IP 的额度不会按 worker 翻倍
pub fn auth_rate_limit_config(auth: &AuthConfig) -> Result<AuthLimiterConfig, ShortspaceError> {
    let burst = auth.login_burst.max(1);
    let seconds = auth.login_seconds_per_request.max(1);

    let config = GovernorConfigBuilder::default()
        .seconds_per_request(seconds)
        .burst_size(burst)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .ok_or_else(|| ShortspaceError::validation("Invalid auth rate limit config"))?;

    debug!(
        "Auth rate limiter created: 1 req/{}s, burst {}",
        seconds, burst
    );
    Ok(config)
}

/// POST /api/auth/signup
pub async fn signup(
    body: web::Json<SignupBody>,
    users: web::Data<Arc<UserService>>,
) -> impl Responder {
    let body = body.into_inner();
    let req = SignupRequest {
        username: body.username,
        email: body.email,
        password: body.password,
    };

    match users.signup(req).await {
        Ok(session) => json_response(
            StatusCode::CREATED,
            ErrorCode::Success,
            "User signed up successfully",
            Some(session),
        ),
        Err(e) => error_from_shortspace(&e),
    }
}

/// POST /api/auth/login
pub async fn login(
    body: web::Json<LoginBody>,
    users: web::Data<Arc<UserService>>,
) -> impl Responder {
    match users.login(&body.email, &body.password).await {
        Ok(session) => json_response(
            StatusCode::OK,
            ErrorCode::Success,
            "Login successful",
            Some(session),
        ),
        Err(e) => error_from_shortspace(&e),
    }
}

/// GET /api/auth/verify
pub async fn verify(
    identity: Option<web::ReqData<Identity>>,
    users: web::Data<Arc<UserService>>,
) -> HttpResponse {
    let Some(identity) = identity else {
        return error_from_shortspace(&ShortspaceError::unauthenticated(
            "Authentication required",
        ));
    };

    match users.verify(&identity).await {
        Ok(user) => success_response(json!({ "user": user })),
        Err(e) => error_from_shortspace(&e),
    }
}
