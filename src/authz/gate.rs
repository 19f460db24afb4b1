use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use super::principal::Principal;
use crate::errors::AppError;
use crate::models::user::Role;

/// Fixed set of roles admitted by a route, built once when the router is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const ADMIN: RoleSet = RoleSet::empty().with(Role::Admin);
    pub const TEACHER_ADMIN: RoleSet = RoleSet::empty().with(Role::Teacher).with(Role::Admin);
    pub const ANY: RoleSet = RoleSet::empty()
        .with(Role::Student)
        .with(Role::Teacher)
        .with(Role::Admin);

    pub const fn empty() -> Self {
        RoleSet(0)
    }

    pub const fn with(self, role: Role) -> Self {
        RoleSet(self.0 | bit(role))
    }

    pub const fn allows(self, role: Role) -> bool {
        self.0 & bit(role) != 0
    }
}

const fn bit(role: Role) -> u8 {
    match role {
        Role::Admin => 1,
        Role::Student => 1 << 1,
        Role::Teacher => 1 << 2,
    }
}

/// Route-level role check. Runs after authentication has stored the principal.
pub async fn enforce(allowed: RoleSet, req: Request, next: Next) -> Result<Response, AppError> {
    let role = req
        .extensions()
        .get::<Principal>()
        .map(Principal::role)
        .ok_or_else(|| AppError::unauthorized("User not authenticated"))?;

    if !allowed.allows(role) {
        tracing::debug!(role = %role, path = %req.uri().path(), "role gate denied");
        return Err(AppError::forbidden("Access denied: insufficient role"));
    }

    Ok(next.run(req).await)
}
