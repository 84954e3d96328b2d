use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{Result, ShortspaceError};
use crate::services::Identity;

const ACCESS_TOKEN_TYPE: &str = "access";

/// Access Token Claims
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

/// JWT Service for issuing access tokens and verifying bearer credentials
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_days: u64,
}

impl JwtService {
    pub fn new(secret: &str, token_days: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_days: token_days.max(1),
        }
    }

    /// Create JwtService from config
    pub fn from_config() -> Self {
        let config = crate::config::get_config();

        // 未配置 secret 时生成随机值，重启后旧 token 全部失效
        let jwt_secret = if config.auth.jwt_secret.is_empty() {
            warn!("JWT secret not configured or empty, generating secure random token");
            crate::utils::generate_secure_token(32)
        } else {
            config.auth.jwt_secret.clone()
        };

        Self::new(&jwt_secret, config.auth.token_days)
    }

    /// Issue an access token for a user
    pub fn issue_access_token(&self, user_id: &str, email: &str) -> Result<String> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(self.token_days as i64)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Validate Access Token
    pub fn validate_access_token(
        &self,
        token: &str,
    ) -> std::result::Result<AccessClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &Validation::default())?;

        if token_data.claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }

        Ok(token_data.claims)
    }

    /// Bearer credential → Identity；任何失败都是 Unauthenticated
    pub fn verify_identity(&self, token: &str) -> Result<Identity> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ShortspaceError::unauthenticated("Missing bearer token"));
        }

        match self.validate_access_token(token) {
            Ok(claims) if !claims.sub.is_empty() && !claims.email.is_empty() => {
                Ok(Identity::new(claims.sub, claims.email))
            }
            Ok(_) => Err(ShortspaceError::unauthenticated("Token has no subject")),
            Err(e) => {
                debug!("Bearer token rejected: {}", e);
                Err(ShortspaceError::unauthenticated("Invalid or expired token"))
            }
        }
    }

    /// 解析 `Authorization: Bearer <token>` 头
    pub fn verify_authorization_header(&self, header: Option<&str>) -> Result<Identity> {
        let header =
            header.ok_or_else(|| ShortspaceError::unauthenticated("Missing bearer token"))?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or_else(|| ShortspaceError::unauthenticated("Authorization must be a bearer token"))?;

        self.verify_identity(token)
    }
}
