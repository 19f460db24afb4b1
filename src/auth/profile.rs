use super::store::CredentialStore;
use crate::authz::{Principal, RoleProfile};
use crate::errors::AppResult;
use crate::models::user::{Credential, CredentialRecord, Role};

/// Builds the request principal, attaching the role profile when one can be loaded.
///
/// A missing profile or a failed lookup leaves the principal without one; rules
/// that need the profile deny later.
pub async fn attach_profile<S>(store: &S, record: &CredentialRecord) -> Principal
where
    S: CredentialStore + ?Sized,
{
    let principal = Principal::new(Credential::from(record));

    match load_profile(store, record).await {
        Ok(Some(profile)) => principal.with_profile(profile),
        Ok(None) => {
            tracing::debug!(user_id = record.id, role = %record.role, "no role profile found");
            principal
        }
        Err(err) => {
            tracing::warn!(user_id = record.id, role = %record.role, error = %err, "role profile lookup failed");
            principal
        }
    }
}

async fn load_profile<S>(store: &S, record: &CredentialRecord) -> AppResult<Option<RoleProfile>>
where
    S: CredentialStore + ?Sized,
{
    let profile = match record.role {
        Role::Student => store.student(record.id).await?.map(RoleProfile::Student),
        Role::Teacher => store.teacher(record.id).await?.map(RoleProfile::Teacher),
        Role::Admin => store.admin(record.id).await?.map(RoleProfile::Admin),
    };
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::resolver::tests::MemoryStore;
    use crate::models::teacher::Teacher;

    #[tokio::test]
    async fn attaches_matching_profile() {
        let mut store = MemoryStore::default();
        store.add(5, "teach", "password-123", Role::Teacher);
        store.teachers.insert(
            5,
            Teacher {
                id: 5,
                full_name: Some("T".to_string()),
                phone_number: None,
            },
        );
        let record = store.credentials[&5].clone();

        let principal = attach_profile(&store, &record).await;
        assert_eq!(principal.teacher().map(|t| t.id), Some(5));
    }

    #[tokio::test]
    async fn lookup_failure_skips_attachment() {
        let mut store = MemoryStore::default();
        store.add(5, "teach", "password-123", Role::Teacher);
        let record = store.credentials[&5].clone();
        store.failing = true;

        let principal = attach_profile(&store, &record).await;
        assert_eq!(principal.id(), 5);
        assert!(principal.profile.is_none());
    }
}
