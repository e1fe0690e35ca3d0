//! 认证模块
//!
//! HS256 签发的访问令牌和刷新令牌，以及从 `Authorization: Bearer` 头解析调用者身份的提取器。

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::error::CoreError;
use crate::app::AppState;
use crate::config::AuthConfig;

pub const INVALID_TOKEN: &str = "Token inválido o expirado";
pub const INVALID_CREDENTIALS: &str =
    "No se encontró una cuenta activa con las credenciales proporcionadas";

/// 可以申请令牌的账户，密码以 SHA-256 十六进制保存
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    pub password_sha256: String,
}

impl UserAccount {
    pub fn new(username: impl Into<String>, password: &str) -> Self {
        Self {
            username: username.into(),
            password_sha256: hash_password(password),
        }
    }

    fn verify(&self, password: &str) -> bool {
        self.password_sha256.eq_ignore_ascii_case(&hash_password(password))
    }
}

pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT 载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// 令牌对
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    accounts: Arc<Vec<UserAccount>>,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret_key.as_bytes()),
            access_ttl: Duration::minutes(config.access_token_minutes),
            refresh_ttl: Duration::minutes(config.refresh_token_minutes),
            accounts: Arc::new(config.users.clone()),
        }
    }

    /// 用户名密码换取令牌对
    pub fn obtain_pair(&self, username: &str, password: &str) -> Result<TokenPair, CoreError> {
        let account = self
            .accounts
            .iter()
            .find(|account| account.username == username && account.verify(password))
            .ok_or_else(|| CoreError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        Ok(TokenPair {
            access: self.issue(&account.username, TokenType::Access)?,
            refresh: self.issue(&account.username, TokenType::Refresh)?,
        })
    }

    /// 用刷新令牌换新的访问令牌
    pub fn refresh(&self, refresh_token: &str) -> Result<String, CoreError> {
        let claims = self.verify(refresh_token, TokenType::Refresh)?;
        self.issue(&claims.sub, TokenType::Access)
    }

    pub fn issue(&self, subject: &str, token_type: TokenType) -> Result<String, CoreError> {
        let now = Utc::now();
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: subject.to_string(),
            token_type,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| CoreError::Internal(format!("token encoding failed: {}", e)))
    }

    /// 校验签名、有效期和令牌类型
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, CoreError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|e| {
                debug!("Rejected token: {}", e);
                CoreError::Unauthorized(INVALID_TOKEN.to_string())
            })?;

        if data.claims.token_type != expected {
            return Err(CoreError::Unauthorized(INVALID_TOKEN.to_string()));
        }
        Ok(data.claims)
    }
}

/// 当前调用者；没有凭证时为匿名
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Claims>);

impl CurrentUser {
    pub fn username(&self) -> Option<&str> {
        self.0.as_ref().map(|claims| claims.sub.as_str())
    }

    /// 要求已认证，否则返回给定提示的 401
    pub fn require(&self, message: &str) -> Result<&Claims, CoreError> {
        self.0
            .as_ref()
            .ok_or_else(|| CoreError::Unauthorized(message.to_string()))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = CoreError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match header.and_then(|h| h.strip_prefix("Bearer ")) {
            Some(token) => token.trim(),
            None => return Ok(CurrentUser(None)),
        };

        state
            .tokens
            .verify(token, TokenType::Access)
            .map(|claims| CurrentUser(Some(claims)))
    }
}
