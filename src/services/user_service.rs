//! User directory: signup, login and token verification

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::identity::Identity;
use crate::api::jwt::JwtService;
use crate::errors::{Result, ShortspaceError};
use crate::storage::{NewUser, SeaOrmStorage, UserRecord};
use crate::utils::password::{hash_password, verify_password};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;
pub const PASSWORD_MIN_LEN: usize = 6;

/// 登录失败统一提示，不区分用户不存在和密码错误
const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// 对外暴露的用户信息
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub username: String,
}

impl From<UserRecord> for PublicUser {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
        }
    }
}

/// 登录/注册成功后的会话
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: PublicUser,
    pub token: String,
}

/// 邮箱规范化：去空白并转小写
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 形如 `local@domain.tld`，不含空白
pub fn validate_email(email: &str) -> Result<()> {
    let invalid = || ShortspaceError::validation("Invalid email address");

    if email.is_empty() || email.len() > 254 || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

fn validate_username(username: &str) -> Result<()> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(ShortspaceError::validation(format!(
            "Username must be {}-{} characters",
            USERNAME_MIN_LEN, USERNAME_MAX_LEN
        )));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(ShortspaceError::validation(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_LEN
        )));
    }
    Ok(())
}

pub struct UserService {
    storage: Arc<SeaOrmStorage>,
    jwt: Arc<JwtService>,
}

impl UserService {
    pub fn new(storage: Arc<SeaOrmStorage>, jwt: Arc<JwtService>) -> Self {
        Self { storage, jwt }
    }

    pub async fn signup(&self, req: SignupRequest) -> Result<AuthSession> {
        let username = req.username.trim().to_string();
        let email = normalize_email(&req.email);

        validate_username(&username)?;
        validate_email(&email)?;
        validate_password(&req.password)?;

        let password_hash = hash_password(&req.password)?;
        let user = self
            .storage
            .insert_user(NewUser {
                email,
                username,
                password_hash,
            })
            .await?;

        info!("UserService: signed up {} ({})", user.email, user.id);
        self.session_for(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(ShortspaceError::validation(
                "Email and password are required",
            ));
        }

        let Some(user) = self.storage.find_user_by_email(&email).await? else {
            warn!("UserService: login for unknown email");
            return Err(ShortspaceError::auth_failed(INVALID_CREDENTIALS));
        };

        if !verify_password(password, &user.password_hash)? {
            warn!("UserService: wrong password for {}", user.id);
            return Err(ShortspaceError::auth_failed(INVALID_CREDENTIALS));
        }

        info!("UserService: login {}", user.id);
        self.session_for(user)
    }

    /// 加载 token 对应的用户
    pub async fn verify(&self, identity: &Identity) -> Result<PublicUser> {
        self.storage
            .find_user_by_id(&identity.user_id)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| ShortspaceError::not_found("User not found"))
    }

    fn session_for(&self, user: UserRecord) -> Result<AuthSession> {
        let token = self.jwt.issue_access_token(&user.id, &user.email)?;
        Ok(AuthSession {
            user: user.into(),
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("a.b+c@sub.example.io").is_ok());

        for bad in ["", "alice", "@example.com", "alice@", "alice@example", "a b@x.io", "a@b@c.io"] {
            assert!(validate_email(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn test_username_and_password_bounds() {
        assert!(validate_username("abc").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"x".repeat(21)).is_err());

        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
    }
}
