use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::models::admin::Admin;
use crate::models::student::Student;
use crate::models::teacher::Teacher;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
    Teacher,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }

    /// Profile table holding the role-specific record.
    pub const fn profile_table(self) -> &'static str {
        match self {
            Role::Admin => "admins",
            Role::Student => "students",
            Role::Teacher => "teachers",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Role::Admin),
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            other => Err(AppError::bad_request(format!("invalid role: {other}"))),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbCredential {
    pub id: i64,
    pub login: String,
    pub password_hash: String,
    pub salt: String,
    pub role: String,
}

/// Stored credential row. Debug output redacts the hash and salt.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub id: i64,
    pub login: String,
    pub password_hash: String,
    pub salt: String,
    pub role: Role,
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("login", &self.login)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl TryFrom<DbCredential> for CredentialRecord {
    type Error = AppError;

    fn try_from(value: DbCredential) -> Result<Self, Self::Error> {
        let role = value
            .role
            .parse::<Role>()
            .map_err(|_| AppError::internal(format!("user {} has unknown role {}", value.id, value.role)))?;

        Ok(CredentialRecord {
            id: value.id,
            login: value.login,
            password_hash: value.password_hash,
            salt: value.salt,
            role,
        })
    }
}

/// Public view of a credential, carried by the request principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Credential {
    pub id: i64,
    pub login: String,
    pub role: Role,
}

impl From<&CredentialRecord> for Credential {
    fn from(record: &CredentialRecord) -> Self {
        Credential {
            id: record.id,
            login: record.login.clone(),
            role: record.role,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "a.petrova")]
    pub login: String,
    #[schema(example = "S3cureP@ssw0rd")]
    pub password: String,
    #[schema(example = "student")]
    pub role: String,
    #[schema(example = "Anna Petrova")]
    pub full_name: Option<String>,
    #[schema(example = "+7 900 000 00 00")]
    pub phone_number: Option<String>,
    /// Only meaningful for students.
    pub group_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "a.petrova")]
    pub login: String,
    #[schema(example = "S3cureP@ssw0rd")]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub id: i64,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub id: i64,
    pub login: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<Student>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<Teacher>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<Admin>,
}
