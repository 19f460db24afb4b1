use axum::extract::State;
use axum::Json;

use crate::app::AppState;
use crate::auth::{AuthError, PrincipalResolver};
use crate::authz::{Principal, RoleProfile};
use crate::errors::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::jwt::TokenKind;
use crate::models::user::{LoginRequest, MeResponse, RefreshTokenRequest, TokenResponse};

#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resolver = PrincipalResolver::new(&state.store, state.jwt.as_ref());
    let record = resolver
        .verify_login(&payload.login, &payload.password)
        .await
        .map_err(|err| login_failure(err, "Invalid credentials"))?;

    let tokens = state.jwt.issue_pair(record.id)?;
    tracing::info!(user_id = record.id, role = %record.role, "login");

    Ok(Json(TokenResponse {
        id: record.id,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

#[utoipa::path(
    post,
    path = "/api/refresh-token",
    tag = "Auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenResponse),
        (status = 401, description = "Invalid or expired refresh token")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshTokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resolver = PrincipalResolver::new(&state.store, state.jwt.as_ref());
    let record = resolver
        .verify_token_of_kind(&payload.refresh_token, TokenKind::Refresh)
        .await
        .map_err(|err| login_failure(err, "Invalid refresh token"))?;

    let tokens = state.jwt.issue_pair(record.id)?;

    Ok(Json(TokenResponse {
        id: record.id,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Auth",
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "Current principal", body = MeResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(principal: Principal) -> AppResult<Json<MeResponse>> {
    let mut response = MeResponse {
        id: principal.id(),
        login: principal.credential.login.clone(),
        role: principal.role(),
        student: None,
        teacher: None,
        admin: None,
    };

    match principal.profile {
        Some(RoleProfile::Student(student)) => response.student = Some(student),
        Some(RoleProfile::Teacher(teacher)) => response.teacher = Some(teacher),
        Some(RoleProfile::Admin(admin)) => response.admin = Some(admin),
        None => {}
    }

    Ok(Json(response))
}

fn login_failure(err: AuthError, message: &'static str) -> AppError {
    match err {
        AuthError::Store(inner) => inner,
        other => {
            tracing::warn!(reason = %other, "token exchange rejected");
            AppError::unauthorized(message)
        }
    }
}
