use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::app::AppState;
use crate::authz::{authorize, Operation, Principal};
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::models::teacher::{TeacherResponse, TeachersResponse, UpdateTeacherRequest};
use crate::models::IdQuery;

#[utoipa::path(
    get,
    path = "/api/read-all-teachers",
    tag = "Teachers",
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "All live teachers", body = TeachersResponse),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn read_all_teachers(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<TeachersResponse>> {
    authorize(&principal, &Operation::ReadAllTeachers)?;

    let teachers = queries::list_teachers(&state.pool).await?;
    Ok(Json(TeachersResponse { teachers }))
}

#[utoipa::path(
    get,
    path = "/api/read-teacher",
    tag = "Teachers",
    params(IdQuery),
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "Teacher detail", body = TeacherResponse),
        (status = 403, description = "Teachers may only read themselves"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn read_teacher(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> AppResult<Json<TeacherResponse>> {
    authorize(&principal, &Operation::ReadTeacher { teacher_id: query.id })?;

    let teacher = queries::fetch_teacher(&state.pool, query.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("teacher {} not found", query.id)))?;
    Ok(Json(TeacherResponse { teacher }))
}

#[utoipa::path(
    put,
    path = "/api/update-teacher",
    tag = "Teachers",
    request_body = UpdateTeacherRequest,
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "Teacher updated", body = TeacherResponse),
        (status = 400, description = "Nothing to update"),
        (status = 403, description = "Teachers may only update themselves"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn update_teacher(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(payload): ApiJson<UpdateTeacherRequest>,
) -> AppResult<Json<TeacherResponse>> {
    authorize(&principal, &Operation::UpdateTeacher { teacher_id: payload.id })?;

    if payload.is_empty() {
        return Err(AppError::bad_request("no fields to update"));
    }

    let mut teacher = queries::fetch_teacher(&state.pool, payload.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("teacher {} not found", payload.id)))?;

    if payload.full_name.is_some() {
        teacher.full_name = payload.full_name;
    }
    if payload.phone_number.is_some() {
        teacher.phone_number = payload.phone_number;
    }

    sqlx::query("UPDATE teachers SET full_name = ?, phone_number = ? WHERE id = ? AND is_deleted = 0")
        .bind(&teacher.full_name)
        .bind(&teacher.phone_number)
        .bind(teacher.id)
        .execute(&state.pool)
        .await?;

    tracing::info!(teacher_id = teacher.id, updated_by = principal.id(), "teacher updated");
    Ok(Json(TeacherResponse { teacher }))
}

#[utoipa::path(
    delete,
    path = "/api/delete-teacher",
    tag = "Teachers",
    params(IdQuery),
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "Teacher soft deleted"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn delete_teacher(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> AppResult<StatusCode> {
    authorize(&principal, &Operation::DeleteTeacher)?;

    queries::soft_delete(&state.pool, "teachers", query.id).await?;
    tracing::info!(teacher_id = query.id, deleted_by = principal.id(), "teacher deleted");
    Ok(StatusCode::OK)
}
