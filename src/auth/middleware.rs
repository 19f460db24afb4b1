use std::future::Future;
use std::time::Duration;

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use super::resolver::PrincipalResolver;
use super::AuthError;
use crate::app::AppState;
use crate::authz::Principal;
use crate::errors::AppError;

/// Authenticates the request and stores the [`Principal`] in its extensions.
///
/// Credential lookup and profile attachment share one deadline; running out of
/// time yields 504 rather than 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // A header that is not visible ASCII is treated as absent.
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let resolver = PrincipalResolver::new(&state.store, state.jwt.as_ref());
    let principal = within(state.auth_timeout, resolver.authenticate(header.as_deref())).await?;

    tracing::debug!(user_id = principal.id(), role = %principal.role(), "authenticated");
    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

/// Runs an authentication step under the lookup deadline.
async fn within<T, F>(limit: Duration, step: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AuthError>>,
{
    let outcome = tokio::time::timeout(limit, step).await.map_err(|_| {
        tracing::warn!(timeout_ms = limit.as_millis() as u64, "authentication timed out");
        AppError::timeout("Authentication timed out")
    })?;

    outcome.map_err(|err| {
        tracing::warn!(reason = %err, "authentication failed");
        AppError::from(err)
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("User not authenticated"))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    use super::*;
    use crate::auth::resolver::tests::MemoryStore;
    use crate::jwt::JwtConfig;
    use crate::models::user::Role;

    #[tokio::test]
    async fn slow_lookup_times_out_with_504() {
        let err = within::<(), _>(Duration::from_millis(10), std::future::pending())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn password_check_does_not_outrun_the_deadline() {
        let mut store = MemoryStore::default();
        store.add(1, "alice", "correct-password", Role::Student);
        let jwt = JwtConfig::new("middleware-test");
        let resolver = PrincipalResolver::new(&store, &jwt);
        let header = format!("Basic {}", STANDARD.encode("alice:correct-password"));

        let err = within(Duration::from_millis(1), resolver.authenticate(Some(&header)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn auth_failure_inside_deadline_is_401() {
        let err = within::<(), _>(Duration::from_secs(1), async { Err(AuthError::InvalidToken) })
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn principal_extractor_requires_authentication() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        let err = Principal::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}
