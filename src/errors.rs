use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum ShortspaceError {
    Unauthenticated(String),
    AuthFailed(String),
    InvalidUrl(String),
    InvalidCode(String),
    Validation(String),
    CodeConflict(String),
    EmailTaken(String),
    AllocationExhausted(String),
    NotFound(String),
    StoreUnavailable(String),
    DatabaseConfig(String),
    DatabaseOperation(String),
    PasswordHash(String),
    TokenIssue(String),
}

impl ShortspaceError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortspaceError::Unauthenticated(_) => "E001",
            ShortspaceError::AuthFailed(_) => "E002",
            ShortspaceError::InvalidUrl(_) => "E003",
            ShortspaceError::InvalidCode(_) => "E004",
            ShortspaceError::Validation(_) => "E005",
            ShortspaceError::CodeConflict(_) => "E006",
            ShortspaceError::EmailTaken(_) => "E007",
            ShortspaceError::AllocationExhausted(_) => "E008",
            ShortspaceError::NotFound(_) => "E009",
            ShortspaceError::StoreUnavailable(_) => "E010",
            ShortspaceError::DatabaseConfig(_) => "E011",
            ShortspaceError::DatabaseOperation(_) => "E012",
            ShortspaceError::PasswordHash(_) => "E013",
            ShortspaceError::TokenIssue(_) => "E014",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortspaceError::Unauthenticated(_) => "Unauthenticated",
            ShortspaceError::AuthFailed(_) => "Authentication Failed",
            ShortspaceError::InvalidUrl(_) => "Invalid URL",
            ShortspaceError::InvalidCode(_) => "Invalid Short Code",
            ShortspaceError::Validation(_) => "Validation Error",
            ShortspaceError::CodeConflict(_) => "Short Code Conflict",
            ShortspaceError::EmailTaken(_) => "Email Already Registered",
            ShortspaceError::AllocationExhausted(_) => "Code Allocation Exhausted",
            ShortspaceError::NotFound(_) => "Resource Not Found",
            ShortspaceError::StoreUnavailable(_) => "Store Unavailable",
            ShortspaceError::DatabaseConfig(_) => "Database Configuration Error",
            ShortspaceError::DatabaseOperation(_) => "Database Operation Error",
            ShortspaceError::PasswordHash(_) => "Password Hash Error",
            ShortspaceError::TokenIssue(_) => "Token Issue Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortspaceError::Unauthenticated(msg)
            | ShortspaceError::AuthFailed(msg)
            | ShortspaceError::InvalidUrl(msg)
            | ShortspaceError::InvalidCode(msg)
            | ShortspaceError::Validation(msg)
            | ShortspaceError::CodeConflict(msg)
            | ShortspaceError::EmailTaken(msg)
            | ShortspaceError::AllocationExhausted(msg)
            | ShortspaceError::NotFound(msg)
            | ShortspaceError::StoreUnavailable(msg)
            | ShortspaceError::DatabaseConfig(msg)
            | ShortspaceError::DatabaseOperation(msg)
            | ShortspaceError::PasswordHash(msg)
            | ShortspaceError::TokenIssue(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            ShortspaceError::Unauthenticated(_) | ShortspaceError::AuthFailed(_) => {
                StatusCode::UNAUTHORIZED
            }
            ShortspaceError::InvalidUrl(_)
            | ShortspaceError::InvalidCode(_)
            | ShortspaceError::Validation(_) => StatusCode::BAD_REQUEST,
            ShortspaceError::CodeConflict(_) | ShortspaceError::EmailTaken(_) => {
                StatusCode::CONFLICT
            }
            ShortspaceError::NotFound(_) => StatusCode::NOT_FOUND,
            ShortspaceError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ShortspaceError::AllocationExhausted(_)
            | ShortspaceError::DatabaseConfig(_)
            | ShortspaceError::DatabaseOperation(_)
            | ShortspaceError::PasswordHash(_)
            | ShortspaceError::TokenIssue(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 调用方可以安全地整体重试（存储层暂时不可用）
    pub fn is_transient(&self) -> bool {
        matches!(self, ShortspaceError::StoreUnavailable(_))
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortspaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortspaceError {}

// 便捷的构造函数
impl ShortspaceError {
    pub fn unauthenticated<T: Into<String>>(msg: T) -> Self {
        ShortspaceError::Unauthenticated(msg.into())
    }

    pub fn auth_failed<T: Into<String>>(msg: T) -> Self {
        ShortspaceError::AuthFailed(msg.into())
    }

    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        ShortspaceError::InvalidUrl(msg.into())
    }

    pub fn invalid_code<T: Into<String>>(msg: T) -> Self {
        ShortspaceError::InvalidCode(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ShortspaceError::Validation(msg.into())
    }

    pub fn code_conflict<T: Into<String>>(msg: T) -> Self {
        ShortspaceError::CodeConflict(msg.into())
    }

    pub fn email_taken<T: Into<String>>(msg: T) -> Self {
        ShortspaceError::EmailTaken(msg.into())
    }

    pub fn allocation_exhausted<T: Into<String>>(msg: T) -> Self {
        ShortspaceError::AllocationExhausted(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortspaceError::NotFound(msg.into())
    }

    pub fn store_unavailable<T: Into<String>>(msg: T) -> Self {
        ShortspaceError::StoreUnavailable(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ShortspaceError::DatabaseConfig(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ShortspaceError::DatabaseOperation(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        ShortspaceError::PasswordHash(msg.into())
    }

    pub fn token_issue<T: Into<String>>(msg: T) -> Self {
        ShortspaceError::TokenIssue(msg.into())
    }
}

impl From<sea_orm::DbErr> for ShortspaceError {
    fn from(err: sea_orm::DbErr) -> Self {
        use sea_orm::DbErr;

        match err {
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
                ShortspaceError::StoreUnavailable(err.to_string())
            }
            other => ShortspaceError::DatabaseOperation(other.to_string()),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for ShortspaceError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ShortspaceError::TokenIssue(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortspaceError>;
