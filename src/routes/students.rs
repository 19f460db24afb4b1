use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use sqlx::SqlitePool;

use crate::app::AppState;
use crate::authz::{authorize, Operation, Principal};
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::models::student::{StudentResponse, StudentsResponse, UpdateStudentRequest};
use crate::models::IdQuery;
use crate::models::user::Role;

#[utoipa::path(
    get,
    path = "/api/read-all-students",
    tag = "Students",
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "All live students", body = StudentsResponse),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn read_all_students(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<StudentsResponse>> {
    authorize(&principal, &Operation::ReadAllStudents)?;

    let students = queries::list_students(&state.pool).await?;
    Ok(Json(StudentsResponse { students }))
}

#[utoipa::path(
    get,
    path = "/api/read-all-students-by-group-id",
    tag = "Students",
    params(IdQuery),
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "Students of the group", body = StudentsResponse),
        (status = 403, description = "Group is not the caller's own or taught by the caller"),
        (status = 404, description = "Group not found")
    )
)]
pub async fn read_students_by_group(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> AppResult<Json<StudentsResponse>> {
    let group = queries::fetch_group(&state.pool, query.id).await?;

    authorize(
        &principal,
        &Operation::ReadStudentsByGroup {
            group_id: query.id,
            group_teacher_id: group.as_ref().and_then(|g| g.teacher_id),
        },
    )?;

    if group.is_none() {
        return Err(AppError::not_found(format!("group {} not found", query.id)));
    }

    let students = queries::list_students_by_group(&state.pool, query.id).await?;
    Ok(Json(StudentsResponse { students }))
}

#[utoipa::path(
    get,
    path = "/api/read-student",
    tag = "Students",
    params(IdQuery),
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "Student detail", body = StudentResponse),
        (status = 403, description = "Student is neither the caller nor in a group the caller teaches"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn read_student(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> AppResult<Json<StudentResponse>> {
    let target = queries::fetch_student(&state.pool, query.id).await?;
    let target_group_id = target.as_ref().and_then(|s| s.group_id);

    // Only a teacher's rule depends on who teaches the target's group.
    let group_teacher_id = match (principal.role(), target_group_id) {
        (Role::Teacher, Some(group_id)) => group_teacher(&state.pool, group_id).await?,
        _ => None,
    };

    authorize(
        &principal,
        &Operation::ReadStudent {
            student_id: query.id,
            target_group_id,
            group_teacher_id,
        },
    )?;

    let student = target.ok_or_else(|| AppError::not_found(format!("student {} not found", query.id)))?;
    Ok(Json(StudentResponse { student }))
}

#[utoipa::path(
    put,
    path = "/api/update-student",
    tag = "Students",
    request_body = UpdateStudentRequest,
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 400, description = "Nothing to update or unknown group"),
        (status = 403, description = "Students may only update themselves"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn update_student(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(payload): ApiJson<UpdateStudentRequest>,
) -> AppResult<Json<StudentResponse>> {
    authorize(&principal, &Operation::UpdateStudent { student_id: payload.id })?;

    if payload.is_empty() {
        return Err(AppError::bad_request("no fields to update"));
    }

    let mut student = queries::fetch_student(&state.pool, payload.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("student {} not found", payload.id)))?;

    if let Some(group_id) = payload.group_id {
        queries::ensure_group_exists(&state.pool, group_id).await?;
        student.group_id = Some(group_id);
    }
    if payload.full_name.is_some() {
        student.full_name = payload.full_name;
    }
    if payload.phone_number.is_some() {
        student.phone_number = payload.phone_number;
    }

    sqlx::query("UPDATE students SET full_name = ?, phone_number = ?, group_id = ? WHERE id = ? AND is_deleted = 0")
        .bind(&student.full_name)
        .bind(&student.phone_number)
        .bind(student.group_id)
        .bind(student.id)
        .execute(&state.pool)
        .await?;

    let student = queries::fetch_student(&state.pool, payload.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("student {} not found", payload.id)))?;

    tracing::info!(student_id = student.id, updated_by = principal.id(), "student updated");
    Ok(Json(StudentResponse { student }))
}

#[utoipa::path(
    delete,
    path = "/api/delete-student",
    tag = "Students",
    params(IdQuery),
    security(("basicAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "Student soft deleted"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn delete_student(
    State(state): State<AppState>,
    principal: Principal,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> AppResult<StatusCode> {
    authorize(&principal, &Operation::DeleteStudent)?;

    queries::soft_delete(&state.pool, "students", query.id).await?;
    tracing::info!(student_id = query.id, deleted_by = principal.id(), "student deleted");
    Ok(StatusCode::OK)
}

async fn group_teacher(pool: &SqlitePool, group_id: i64) -> AppResult<Option<i64>> {
    Ok(queries::fetch_group(pool, group_id)
        .await?
        .and_then(|group| group.teacher_id))
}
