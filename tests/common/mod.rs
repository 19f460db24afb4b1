#![allow(dead_code)]

use std::time::Duration;

use anyhow::Result;
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

use keen_eye::db::queries::{self, NewUser};
use keen_eye::jwt::JwtConfig;
use keen_eye::models::user::Role;
use keen_eye::password::hash_password;
use keen_eye::{create_app_with, AppConfig};

pub const SECRET: &str = "test-secret";
pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    pub jwt: JwtConfig,
    // keeps the database file alive
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(5)).await
    }

    pub async fn with_timeout(timeout: Duration) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let opts = SqliteConnectOptions::new()
            .filename(dir.path().join("test.db"))
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(opts).await?;

        let migrator =
            sqlx::migrate::Migrator::new(std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations")).await?;
        migrator.run(&pool).await?;

        let jwt = JwtConfig::new(SECRET);
        let config = AppConfig::new(jwt.clone()).with_auth_lookup_timeout(timeout);
        let app = create_app_with(pool.clone(), config);

        Ok(Self {
            app,
            pool,
            jwt,
            _dir: dir,
        })
    }

    pub async fn user(&self, login: &str, role: Role, group_id: Option<i64>) -> Result<i64> {
        let id = queries::insert_user(
            &self.pool,
            &NewUser {
                login: login.to_string(),
                password: hash_password(PASSWORD)?,
                role,
                full_name: Some(format!("{login} full name")),
                phone_number: None,
                group_id,
            },
        )
        .await?;
        Ok(id)
    }

    pub async fn group(&self, name: &str, teacher_id: Option<i64>) -> Result<i64> {
        let id = sqlx::query("INSERT INTO study_groups (name, teacher_id) VALUES (?, ?)")
            .bind(name)
            .bind(teacher_id)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        Ok(id)
    }

    pub fn bearer(&self, id: i64) -> Result<String> {
        let token = self.jwt.issue(id, keen_eye::jwt::TokenKind::Access)?;
        Ok(format!("Bearer {token}"))
    }

    pub async fn send(&self, req: Request<Body>) -> Result<(StatusCode, Value)> {
        let resp = self.app.clone().oneshot(req).await?;
        let status = resp.status();
        let bytes = body::to_bytes(resp.into_body(), 1_048_576).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Ok((status, value))
    }

    pub async fn get(&self, uri: &str, auth: &str) -> Result<(StatusCode, Value)> {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .header("authorization", auth)
            .body(Body::empty())?;
        self.send(req).await
    }

    pub async fn delete(&self, uri: &str, auth: &str) -> Result<(StatusCode, Value)> {
        let req = Request::builder()
            .method("DELETE")
            .uri(uri)
            .header("authorization", auth)
            .body(Body::empty())?;
        self.send(req).await
    }

    pub async fn json(&self, method: &str, uri: &str, auth: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        self.send(builder.body(Body::from(body.to_string()))?).await
    }
}

pub fn basic(login: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{login}:{password}")))
}
