use std::time::Duration;

use crate::errors::AppError;
use crate::jwt::JwtConfig;

const DEFAULT_AUTH_LOOKUP_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt: JwtConfig,
    /// Deadline for credential and profile lookups during authentication.
    pub auth_lookup_timeout: Duration,
    pub port: u16,
}

impl AppConfig {
    pub fn new(jwt: JwtConfig) -> Self {
        Self {
            jwt,
            auth_lookup_timeout: Duration::from_millis(DEFAULT_AUTH_LOOKUP_TIMEOUT_MS),
            port: DEFAULT_PORT,
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        let jwt = JwtConfig::from_env()?;
        let timeout_ms = parse_env("AUTH_LOOKUP_TIMEOUT_MS", DEFAULT_AUTH_LOOKUP_TIMEOUT_MS)?;
        let port = parse_env("APP_PORT", DEFAULT_PORT)?;

        Ok(Self {
            jwt,
            auth_lookup_timeout: Duration::from_millis(timeout_ms),
            port,
        })
    }

    pub fn with_auth_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.auth_lookup_timeout = timeout;
        self
    }
}

pub fn database_url() -> Result<String, AppError> {
    std::env::var("DATABASE_URL").map_err(|_| AppError::configuration("DATABASE_URL not set"))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::configuration(format!("{key} has an invalid value: {value}"))),
        Err(_) => Ok(default),
    }
}
