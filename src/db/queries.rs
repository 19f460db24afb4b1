//! Shared read queries and the user-creation transaction.
//!
//! Every profile and group read filters out soft-deleted rows.

use sqlx::SqlitePool;

use crate::errors::{AppError, AppResult};
use crate::models::admin::Admin;
use crate::models::group::Group;
use crate::models::student::Student;
use crate::models::teacher::Teacher;
use crate::models::user::{CredentialRecord, DbCredential, Role};
use crate::password::SaltedHash;

const STUDENT_SELECT: &str = "SELECT s.id, s.full_name, s.phone_number, s.group_id, g.name AS group_name \
     FROM students s LEFT JOIN study_groups g ON g.id = s.group_id AND g.is_deleted = 0";

pub async fn fetch_credential_by_login(pool: &SqlitePool, login: &str) -> AppResult<Option<CredentialRecord>> {
    sqlx::query_as::<_, DbCredential>("SELECT id, login, password_hash, salt, role FROM users WHERE login = ?")
        .bind(login)
        .fetch_optional(pool)
        .await?
        .map(CredentialRecord::try_from)
        .transpose()
}

pub async fn fetch_credential_by_id(pool: &SqlitePool, id: i64) -> AppResult<Option<CredentialRecord>> {
    sqlx::query_as::<_, DbCredential>("SELECT id, login, password_hash, salt, role FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(CredentialRecord::try_from)
        .transpose()
}

pub async fn fetch_student(pool: &SqlitePool, id: i64) -> AppResult<Option<Student>> {
    let sql = format!("{STUDENT_SELECT} WHERE s.id = ? AND s.is_deleted = 0");
    Ok(sqlx::query_as::<_, Student>(&sql).bind(id).fetch_optional(pool).await?)
}

pub async fn list_students(pool: &SqlitePool) -> AppResult<Vec<Student>> {
    let sql = format!("{STUDENT_SELECT} WHERE s.is_deleted = 0 ORDER BY s.id");
    Ok(sqlx::query_as::<_, Student>(&sql).fetch_all(pool).await?)
}

pub async fn list_students_by_group(pool: &SqlitePool, group_id: i64) -> AppResult<Vec<Student>> {
    let sql = format!("{STUDENT_SELECT} WHERE s.group_id = ? AND s.is_deleted = 0 ORDER BY s.id");
    Ok(sqlx::query_as::<_, Student>(&sql).bind(group_id).fetch_all(pool).await?)
}

pub async fn fetch_teacher(pool: &SqlitePool, id: i64) -> AppResult<Option<Teacher>> {
    Ok(sqlx::query_as::<_, Teacher>(
        "SELECT id, full_name, phone_number FROM teachers WHERE id = ? AND is_deleted = 0",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?)
}

pub async fn list_teachers(pool: &SqlitePool) -> AppResult<Vec<Teacher>> {
    Ok(sqlx::query_as::<_, Teacher>(
        "SELECT id, full_name, phone_number FROM teachers WHERE is_deleted = 0 ORDER BY id",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn fetch_admin(pool: &SqlitePool, id: i64) -> AppResult<Option<Admin>> {
    Ok(sqlx::query_as::<_, Admin>(
        "SELECT id, full_name, phone_number FROM admins WHERE id = ? AND is_deleted = 0",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?)
}

pub async fn fetch_group(pool: &SqlitePool, id: i64) -> AppResult<Option<Group>> {
    Ok(sqlx::query_as::<_, Group>(
        "SELECT id, name, teacher_id FROM study_groups WHERE id = ? AND is_deleted = 0",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?)
}

pub async fn list_groups(pool: &SqlitePool) -> AppResult<Vec<Group>> {
    Ok(sqlx::query_as::<_, Group>(
        "SELECT id, name, teacher_id FROM study_groups WHERE is_deleted = 0 ORDER BY id",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn ensure_group_exists(pool: &SqlitePool, group_id: i64) -> AppResult<()> {
    match fetch_group(pool, group_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::bad_request(format!("group {group_id} does not exist"))),
    }
}

pub async fn ensure_teacher_exists(pool: &SqlitePool, teacher_id: i64) -> AppResult<()> {
    match fetch_teacher(pool, teacher_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::bad_request(format!("teacher {teacher_id} does not exist"))),
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: String,
    pub password: SaltedHash,
    pub role: Role,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub group_id: Option<i64>,
}

/// Inserts the credential and its role profile in one transaction, returning the shared id.
pub async fn insert_user(pool: &SqlitePool, user: &NewUser) -> AppResult<i64> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query("INSERT INTO users (login, password_hash, salt, role) VALUES (?, ?, ?, ?)")
        .bind(&user.login)
        .bind(&user.password.hash)
        .bind(&user.password.salt)
        .bind(user.role.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db) = &err {
                if db.is_unique_violation() {
                    return AppError::conflict(format!("login {} is already taken", user.login));
                }
            }
            AppError::from(err)
        })?;
    let id = inserted.last_insert_rowid();

    match user.role {
        Role::Student => {
            sqlx::query("INSERT INTO students (id, full_name, phone_number, group_id) VALUES (?, ?, ?, ?)")
                .bind(id)
                .bind(&user.full_name)
                .bind(&user.phone_number)
                .bind(user.group_id)
                .execute(&mut *tx)
                .await?;
        }
        Role::Teacher | Role::Admin => {
            let sql = format!(
                "INSERT INTO {} (id, full_name, phone_number) VALUES (?, ?, ?)",
                user.role.profile_table()
            );
            sqlx::query(&sql)
                .bind(id)
                .bind(&user.full_name)
                .bind(&user.phone_number)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;

    Ok(id)
}

/// Flags a live row as deleted. `table` must be one of the soft-deletable tables.
pub async fn soft_delete(pool: &SqlitePool, table: &'static str, id: i64) -> AppResult<()> {
    let sql = format!("UPDATE {table} SET is_deleted = 1 WHERE id = ? AND is_deleted = 0");
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(format!("{} {id} not found", singular(table))));
    }

    Ok(())
}

fn singular(table: &str) -> &str {
    match table {
        "study_groups" => "group",
        other => other.strip_suffix('s').unwrap_or(other),
    }
}
