use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::app::AppState;
use crate::authz::{authorize, Operation, Principal};
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::models::admin::{AdminResponse, UpdateAdminRequest};
use crate::models::IdQuery;

#[utoipa::path(
    get,
    path = "/api/read-admin",
    tag = "Admins",
    params(IdQuery),
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "Admin detail", body = AdminResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Admin not found")
    )
)]
pub async fn read_admin(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> AppResult<Json<AdminResponse>> {
    authorize(&principal, &Operation::ReadAdmin)?;

    let admin = queries::fetch_admin(&state.pool, query.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("admin {} not found", query.id)))?;
    Ok(Json(AdminResponse { admin }))
}

#[utoipa::path(
    put,
    path = "/api/update-admin",
    tag = "Admins",
    request_body = UpdateAdminRequest,
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "Admin updated", body = AdminResponse),
        (status = 400, description = "Nothing to update"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Admin not found")
    )
)]
pub async fn update_admin(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(payload): ApiJson<UpdateAdminRequest>,
) -> AppResult<Json<AdminResponse>> {
    authorize(&principal, &Operation::UpdateAdmin)?;

    if payload.is_empty() {
        return Err(AppError::bad_request("no fields to update"));
    }

    let mut admin = queries::fetch_admin(&state.pool, payload.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("admin {} not found", payload.id)))?;

    if payload.full_name.is_some() {
        admin.full_name = payload.full_name;
    }
    if payload.phone_number.is_some() {
        admin.phone_number = payload.phone_number;
    }

    sqlx::query("UPDATE admins SET full_name = ?, phone_number = ? WHERE id = ? AND is_deleted = 0")
        .bind(&admin.full_name)
        .bind(&admin.phone_number)
        .bind(admin.id)
        .execute(&state.pool)
        .await?;

    Ok(Json(AdminResponse { admin }))
}

#[utoipa::path(
    delete,
    path = "/api/delete-admin",
    tag = "Admins",
    params(IdQuery),
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "Admin soft deleted"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Admin not found")
    )
)]
pub async fn delete_admin(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> AppResult<StatusCode> {
    authorize(&principal, &Operation::DeleteAdmin)?;

    queries::soft_delete(&state.pool, "admins", query.id).await?;
    tracing::info!(admin_id = query.id, deleted_by = principal.id(), "admin deleted");
    Ok(StatusCode::OK)
}
