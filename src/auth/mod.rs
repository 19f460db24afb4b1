//! Authentication - header parsing, credential lookup and principal construction

pub mod header;
pub mod middleware;
pub mod profile;
pub mod resolver;
pub mod store;

pub use header::{parse_authorization, Credentials};
pub use middleware::authenticate;
pub use resolver::PrincipalResolver;
pub use store::{CredentialStore, SqliteCredentialStore};

use crate::errors::AppError;

/// Why a request failed to authenticate.
///
/// `Display` carries the server-side reason; [`AuthError::client_message`] is what
/// the caller sees.
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("missing or unsupported authorization scheme")]
    MissingScheme,
    #[error("basic credentials are not valid base64")]
    MalformedEncoding,
    #[error("basic credentials lack a login:password separator")]
    MalformedCredentials,
    #[error("unknown login or wrong password")]
    InvalidCredentials,
    #[error("token failed verification")]
    InvalidToken,
    #[error("token subject no longer exists")]
    UnknownSubject,
    #[error(transparent)]
    Store(#[from] AppError),
}

impl AuthError {
    pub fn client_message(&self) -> &'static str {
        match self {
            AuthError::MissingScheme => "Unsupported or missing Authorization header",
            AuthError::MalformedEncoding => "Invalid base64 encoding",
            AuthError::MalformedCredentials => "Invalid Basic auth format",
            AuthError::InvalidCredentials => "Invalid Basic credentials",
            AuthError::InvalidToken | AuthError::UnknownSubject => "Invalid JWT token",
            AuthError::Store(_) => "internal server error",
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(inner) => inner,
            other => AppError::unauthorized(other.client_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn auth_failures_become_unauthorized() {
        let err = AppError::from(AuthError::UnknownSubject);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Invalid JWT token"));
    }

    #[test]
    fn store_failures_pass_through() {
        let err = AppError::from(AuthError::Store(AppError::internal("db down")));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
