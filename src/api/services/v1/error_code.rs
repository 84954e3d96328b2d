//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::ShortspaceError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证与用户错误
/// - 3000-3099: 链接错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenInvalid = 2002,
    EmailTaken = 2005,

    // 链接错误 3000-3099
    LinkCodeConflict = 3001,
    LinkInvalidUrl = 3002,
    LinkInvalidCode = 3003,
    LinkAllocationExhausted = 3004,
    LinkDatabaseError = 3005,
}

impl From<&ShortspaceError> for ErrorCode {
    fn from(err: &ShortspaceError) -> Self {
        match err {
            ShortspaceError::Unauthenticated(_) => ErrorCode::Unauthorized,
            ShortspaceError::AuthFailed(_) => ErrorCode::AuthFailed,
            ShortspaceError::InvalidUrl(_) => ErrorCode::LinkInvalidUrl,
            ShortspaceError::InvalidCode(_) => ErrorCode::LinkInvalidCode,
            ShortspaceError::Validation(_) => ErrorCode::BadRequest,
            ShortspaceError::CodeConflict(_) => ErrorCode::LinkCodeConflict,
            ShortspaceError::EmailTaken(_) => ErrorCode::EmailTaken,
            ShortspaceError::AllocationExhausted(_) => ErrorCode::LinkAllocationExhausted,
            ShortspaceError::NotFound(_) => ErrorCode::NotFound,
            ShortspaceError::StoreUnavailable(_) => ErrorCode::ServiceUnavailable,
            ShortspaceError::DatabaseConfig(_) | ShortspaceError::DatabaseOperation(_) => {
                ErrorCode::LinkDatabaseError
            }
            ShortspaceError::PasswordHash(_) | ShortspaceError::TokenIssue(_) => {
                ErrorCode::InternalServerError
            }
        }
    }
}
