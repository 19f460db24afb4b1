use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

const DEFAULT_ACCESS_TTL_MINUTES: i64 = 15;
const DEFAULT_REFRESH_TTL_MINUTES: i64 = 60 * 24 * 7;
const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: Arc<Vec<u8>>,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl JwtConfig {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: Arc::new(secret.into()),
            access_ttl: Duration::minutes(DEFAULT_ACCESS_TTL_MINUTES),
            refresh_ttl: Duration::minutes(DEFAULT_REFRESH_TTL_MINUTES),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| AppError::configuration("JWT_SECRET not set"))?;
        let access_ttl = ttl_from_env("JWT_ACCESS_TTL_MINUTES", DEFAULT_ACCESS_TTL_MINUTES)?;
        let refresh_ttl = ttl_from_env("JWT_REFRESH_TTL_MINUTES", DEFAULT_REFRESH_TTL_MINUTES)?;

        Ok(Self {
            secret: Arc::new(secret.into_bytes()),
            access_ttl,
            refresh_ttl,
        })
    }

    /// Issues a token of the given kind using the configured lifetime for it.
    pub fn issue(&self, subject: i64, kind: TokenKind) -> Result<String, AppError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        self.issue_with_ttl(subject, kind, ttl)
    }

    pub fn issue_with_ttl(&self, subject: i64, kind: TokenKind, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now + ttl;

        let claims = Claims {
            sub: subject,
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
            typ: kind,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(&self.secret))
            .map_err(|err| AppError::internal(format!("failed to sign token: {err}")))
    }

    pub fn issue_pair(&self, subject: i64) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.issue(subject, TokenKind::Access)?,
            refresh_token: self.issue(subject, TokenKind::Refresh)?,
        })
    }

    /// Checks signature, expiry (no leeway) and that the token is of the expected kind.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;

        let claims = jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)
            .map_err(|err| AppError::token(err.to_string()))?;

        if claims.typ != expected {
            return Err(AppError::token("unexpected token type"));
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

fn ttl_from_env(key: &str, default: i64) -> Result<Duration, AppError> {
    match std::env::var(key) {
        Ok(value) => parse_ttl(key, &value),
        Err(_) => Ok(Duration::minutes(default)),
    }
}

/// Token lifetimes are whole minutes in `1..=MAX_TTL_MINUTES`.
fn parse_ttl(key: &str, value: &str) -> Result<Duration, AppError> {
    let minutes = value
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::configuration(format!("{key} must be a valid integer")))?;

    if !(1..=MAX_TTL_MINUTES).contains(&minutes) {
        return Err(AppError::configuration(format!(
            "{key} must be between 1 and {MAX_TTL_MINUTES} minutes"
        )));
    }

    Ok(Duration::minutes(minutes))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
    pub iat: usize,
    pub typ: TokenKind,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}
