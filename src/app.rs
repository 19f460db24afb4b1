use std::sync::Arc;
use std::time::Duration;

use axum::extract::Request;
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::routing::{delete, get, post, put};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{authenticate, SqliteCredentialStore};
use crate::authz::{gate, RoleSet};
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::jwt::JwtConfig;
use crate::routes::{admins, auth, groups, health, students, teachers, users};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub store: SqliteCredentialStore,
    pub jwt: Arc<JwtConfig>,
    pub auth_timeout: Duration,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfig) -> Self {
        Self {
            store: SqliteCredentialStore::new(pool.clone()),
            pool,
            jwt: Arc::new(config.jwt),
            auth_timeout: config.auth_lookup_timeout,
        }
    }
}

pub async fn create_app(pool: SqlitePool) -> Result<Router, AppError> {
    let config = AppConfig::from_env()?;
    Ok(create_app_with(pool, config))
}

pub fn create_app_with(pool: SqlitePool, config: AppConfig) -> Router {
    let state = AppState::new(pool, config);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/login", post(auth::login))
        .route("/refresh-token", post(auth::refresh_token));

    let admin_routes = Router::new()
        .route("/create-user", post(users::create_user))
        .route("/read-all-students", get(students::read_all_students))
        .route("/delete-student", delete(students::delete_student))
        .route("/read-all-teachers", get(teachers::read_all_teachers))
        .route("/delete-teacher", delete(teachers::delete_teacher))
        .route("/read-admin", get(admins::read_admin))
        .route("/update-admin", put(admins::update_admin))
        .route("/delete-admin", delete(admins::delete_admin))
        .route("/create-group", post(groups::create_group))
        .route("/read-all-groups", get(groups::read_all_groups))
        .route("/update-group", put(groups::update_group))
        .route("/delete-group", delete(groups::delete_group));

    let teacher_admin_routes = Router::new()
        .route("/read-teacher", get(teachers::read_teacher))
        .route("/update-teacher", put(teachers::update_teacher));

    // Ownership is checked per handler once the target is known.
    let any_role_routes = Router::new()
        .route("/read-all-students-by-group-id", get(students::read_students_by_group))
        .route("/read-student", get(students::read_student))
        .route("/update-student", put(students::update_student))
        .route("/read-group", get(groups::read_group))
        .route("/me", get(auth::me));

    let protected_routes = Router::new()
        .merge(gated(admin_routes, RoleSet::ADMIN))
        .merge(gated(teacher_admin_routes, RoleSet::TEACHER_ADMIN))
        .merge(gated(any_role_routes, RoleSet::ANY))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn gated(router: Router<AppState>, allowed: RoleSet) -> Router<AppState> {
    router.route_layer(middleware::from_fn(move |req: Request, next: Next| {
        gate::enforce(allowed, req, next)
    }))
}
