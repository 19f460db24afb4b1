use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::queries;
use crate::errors::AppResult;
use crate::models::admin::Admin;
use crate::models::student::Student;
use crate::models::teacher::Teacher;
use crate::models::user::CredentialRecord;

/// Read access to credentials and role profiles used during authentication.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn credential_by_login(&self, login: &str) -> AppResult<Option<CredentialRecord>>;

    async fn credential_by_id(&self, id: i64) -> AppResult<Option<CredentialRecord>>;

    async fn student(&self, id: i64) -> AppResult<Option<Student>>;

    async fn teacher(&self, id: i64) -> AppResult<Option<Teacher>>;

    async fn admin(&self, id: i64) -> AppResult<Option<Admin>>;
}

#[derive(Debug, Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn credential_by_login(&self, login: &str) -> AppResult<Option<CredentialRecord>> {
        queries::fetch_credential_by_login(&self.pool, login).await
    }

    async fn credential_by_id(&self, id: i64) -> AppResult<Option<CredentialRecord>> {
        queries::fetch_credential_by_id(&self.pool, id).await
    }

    async fn student(&self, id: i64) -> AppResult<Option<Student>> {
        queries::fetch_student(&self.pool, id).await
    }

    async fn teacher(&self, id: i64) -> AppResult<Option<Teacher>> {
        queries::fetch_teacher(&self.pool, id).await
    }

    async fn admin(&self, id: i64) -> AppResult<Option<Admin>> {
        queries::fetch_admin(&self.pool, id).await
    }
}
