use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::AuthError;

const BASIC_PREFIX: &str = "Basic ";
const BEARER_PREFIX: &str = "Bearer ";

/// Credentials carried by an `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { login: String, password: String },
    Bearer(String),
}

impl Credentials {
    pub fn scheme(&self) -> &'static str {
        match self {
            Credentials::Basic { .. } => "basic",
            Credentials::Bearer(_) => "bearer",
        }
    }
}

/// Scheme prefixes are compared case-sensitively.
pub fn parse_authorization(header: Option<&str>) -> Result<Credentials, AuthError> {
    let header = header.ok_or(AuthError::MissingScheme)?;

    if let Some(encoded) = header.strip_prefix(BASIC_PREFIX) {
        return decode_basic(encoded);
    }

    if let Some(token) = header.strip_prefix(BEARER_PREFIX) {
        return Ok(Credentials::Bearer(token.trim().to_string()));
    }

    Err(AuthError::MissingScheme)
}

fn decode_basic(encoded: &str) -> Result<Credentials, AuthError> {
    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AuthError::MalformedEncoding)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedEncoding)?;

    let (login, password) = decoded
        .split_once(':')
        .ok_or(AuthError::MalformedCredentials)?;

    Ok(Credentials::Basic {
        login: login.to_string(),
        password: password.to_string(),
    })
}
