use super::header::{parse_authorization, Credentials};
use super::profile::attach_profile;
use super::store::CredentialStore;
use super::AuthError;
use crate::authz::Principal;
use crate::jwt::{JwtConfig, TokenKind};
use crate::models::user::CredentialRecord;
use crate::password::check_password;

/// Turns an `Authorization` header into a credential record.
pub struct PrincipalResolver<'a, S: ?Sized> {
    store: &'a S,
    jwt: &'a JwtConfig,
}

impl<'a, S> PrincipalResolver<'a, S>
where
    S: CredentialStore + ?Sized,
{
    pub fn new(store: &'a S, jwt: &'a JwtConfig) -> Self {
        Self { store, jwt }
    }

    pub async fn resolve(&self, header: Option<&str>) -> Result<CredentialRecord, AuthError> {
        match parse_authorization(header)? {
            Credentials::Basic { login, password } => self.verify_login(&login, &password).await,
            Credentials::Bearer(token) => self.verify_token(&token).await,
        }
    }

    /// Resolves the header and attaches the role profile.
    pub async fn authenticate(&self, header: Option<&str>) -> Result<Principal, AuthError> {
        let record = self.resolve(header).await?;
        Ok(attach_profile(self.store, &record).await)
    }

    /// Unknown login and wrong password fail identically and pay the same hash cost.
    pub async fn verify_login(&self, login: &str, password: &str) -> Result<CredentialRecord, AuthError> {
        let record = self.store.credential_by_login(login).await?;
        let stored = record
            .as_ref()
            .map(|r| (r.password_hash.as_str(), r.salt.as_str()));

        match (check_password(password, stored).await?, record) {
            (true, Some(record)) => Ok(record),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    pub async fn verify_token(&self, token: &str) -> Result<CredentialRecord, AuthError> {
        self.verify_token_of_kind(token, TokenKind::Access).await
    }

    pub async fn verify_token_of_kind(&self, token: &str, kind: TokenKind) -> Result<CredentialRecord, AuthError> {
        let claims = self
            .jwt
            .verify(token, kind)
            .map_err(|_| AuthError::InvalidToken)?;

        self.store
            .credential_by_id(claims.sub)
            .await?
            .ok_or(AuthError::UnknownSubject)
    }
}
