use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::app::AppState;
use crate::authz::{authorize, Operation, Principal};
use crate::db::queries::{self, NewUser};
use crate::errors::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::models::user::{CreateUserRequest, Role, TokenResponse};
use crate::password::hash_password;

#[utoipa::path(
    post,
    path = "/api/create-user",
    tag = "Users",
    request_body = CreateUserRequest,
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 201, description = "User and role profile created", body = TokenResponse),
        (status = 400, description = "Invalid role, short password or unknown group"),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Login already taken")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    authorize(&principal, &Operation::CreateUser)?;

    let login = payload.login.trim();
    if login.is_empty() {
        return Err(AppError::bad_request("login must not be empty"));
    }

    let role: Role = payload.role.parse()?;
    let group_id = match role {
        Role::Student => payload.group_id,
        Role::Teacher | Role::Admin => {
            if payload.group_id.is_some() {
                return Err(AppError::bad_request("group_id is only accepted for students"));
            }
            None
        }
    };
    if let Some(group_id) = group_id {
        queries::ensure_group_exists(&state.pool, group_id).await?;
    }

    let password = hash_password(&payload.password)?;
    let id = queries::insert_user(
        &state.pool,
        &NewUser {
            login: login.to_string(),
            password,
            role,
            full_name: payload.full_name,
            phone_number: payload.phone_number,
            group_id,
        },
    )
    .await?;

    let tokens = state.jwt.issue_pair(id)?;
    tracing::info!(user_id = id, role = %role, created_by = principal.id(), "user created");

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            id,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }),
    ))
}
