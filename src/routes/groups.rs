use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::app::AppState;
use crate::authz::{authorize, Operation, Principal};
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::models::group::{CreateGroupRequest, GroupResponse, GroupsResponse, UpdateGroupRequest};
use crate::models::{CreatedResponse, IdQuery};

#[utoipa::path(
    post,
    path = "/api/create-group",
    tag = "Groups",
    request_body = CreateGroupRequest,
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 201, description = "Group created", body = CreatedResponse),
        (status = 400, description = "Empty name or unknown teacher"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn create_group(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(payload): ApiJson<CreateGroupRequest>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    authorize(&principal, &Operation::CreateGroup)?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("group name must not be empty"));
    }
    if let Some(teacher_id) = payload.teacher_id {
        queries::ensure_teacher_exists(&state.pool, teacher_id).await?;
    }

    let id = sqlx::query("INSERT INTO study_groups (name, teacher_id) VALUES (?, ?)")
        .bind(name)
        .bind(payload.teacher_id)
        .execute(&state.pool)
        .await?
        .last_insert_rowid();

    tracing::info!(group_id = id, created_by = principal.id(), "group created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    get,
    path = "/api/read-all-groups",
    tag = "Groups",
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "All live groups", body = GroupsResponse),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn read_all_groups(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<GroupsResponse>> {
    authorize(&principal, &Operation::ReadAllGroups)?;

    let groups = queries::list_groups(&state.pool).await?;
    Ok(Json(GroupsResponse { groups }))
}

#[utoipa::path(
    get,
    path = "/api/read-group",
    tag = "Groups",
    params(IdQuery),
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "Group detail", body = GroupResponse),
        (status = 403, description = "Group is not the caller's own or taught by the caller"),
        (status = 404, description = "Group not found")
    )
)]
pub async fn read_group(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> AppResult<Json<GroupResponse>> {
    let group = queries::fetch_group(&state.pool, query.id).await?;

    authorize(
        &principal,
        &Operation::ReadGroup {
            group_id: query.id,
            group_teacher_id: group.as_ref().and_then(|g| g.teacher_id),
        },
    )?;

    let group = group.ok_or_else(|| AppError::not_found(format!("group {} not found", query.id)))?;
    Ok(Json(GroupResponse { group }))
}

#[utoipa::path(
    put,
    path = "/api/update-group",
    tag = "Groups",
    request_body = UpdateGroupRequest,
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "Group updated", body = GroupResponse),
        (status = 400, description = "Nothing to update or unknown teacher"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Group not found")
    )
)]
pub async fn update_group(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(payload): ApiJson<UpdateGroupRequest>,
) -> AppResult<Json<GroupResponse>> {
    authorize(&principal, &Operation::UpdateGroup)?;

    if payload.is_empty() {
        return Err(AppError::bad_request("no fields to update"));
    }

    let mut group = queries::fetch_group(&state.pool, payload.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("group {} not found", payload.id)))?;

    if let Some(name) = payload.name.as_deref().map(str::trim) {
        if name.is_empty() {
            return Err(AppError::bad_request("group name must not be empty"));
        }
        group.name = name.to_string();
    }
    if let Some(teacher_id) = payload.teacher_id {
        if let Some(teacher_id) = teacher_id {
            queries::ensure_teacher_exists(&state.pool, teacher_id).await?;
        }
        group.teacher_id = teacher_id;
    }

    sqlx::query("UPDATE study_groups SET name = ?, teacher_id = ? WHERE id = ? AND is_deleted = 0")
        .bind(&group.name)
        .bind(group.teacher_id)
        .bind(group.id)
        .execute(&state.pool)
        .await?;

    tracing::info!(group_id = group.id, updated_by = principal.id(), "group updated");
    Ok(Json(GroupResponse { group }))
}

#[utoipa::path(
    delete,
    path = "/api/delete-group",
    tag = "Groups",
    params(IdQuery),
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "Group soft deleted"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Group not found")
    )
)]
pub async fn delete_group(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> AppResult<StatusCode> {
    authorize(&principal, &Operation::DeleteGroup)?;

    queries::soft_delete(&state.pool, "study_groups", query.id).await?;
    tracing::info!(group_id = query.id, deleted_by = principal.id(), "group deleted");
    Ok(StatusCode::OK)
}
