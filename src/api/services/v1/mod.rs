//! HTTP API v1
//!
//! - 认证（注册、登录、token 验证）
//! - 链接创建、列表、删除
//! - 命名空间统计

pub mod auth;
pub mod error_code;
mod helpers;
mod links;
pub mod routes;
mod types;

pub use types::*;

pub use helpers::{api_result, error_from_shortspace, error_response, json_config, success_response};

pub use error_code::ErrorCode;

pub use auth::{AuthLimiterConfig, LoginKeyExtractor, auth_rate_limit_config};
pub use routes::api_routes;
