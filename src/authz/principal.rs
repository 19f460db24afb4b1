use crate::models::admin::Admin;
use crate::models::student::Student;
use crate::models::teacher::Teacher;
use crate::models::user::{Credential, Role};

/// Role-specific record attached to a principal after authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleProfile {
    Student(Student),
    Teacher(Teacher),
    Admin(Admin),
}

impl RoleProfile {
    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Student(_) => Role::Student,
            RoleProfile::Teacher(_) => Role::Teacher,
            RoleProfile::Admin(_) => Role::Admin,
        }
    }
}

/// Principal represents the authenticated caller for the lifetime of one request
#[derive(Debug, Clone)]
pub struct Principal {
    pub credential: Credential,
    /// Absent when the credential has no live profile row.
    pub profile: Option<RoleProfile>,
}

impl Principal {
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            profile: None,
        }
    }

    /// Attaches a profile; one whose role disagrees with the credential is dropped.
    pub fn with_profile(mut self, profile: RoleProfile) -> Self {
        if profile.role() == self.credential.role {
            self.profile = Some(profile);
        }
        self
    }

    pub fn id(&self) -> i64 {
        self.credential.id
    }

    pub fn role(&self) -> Role {
        self.credential.role
    }

    pub fn student(&self) -> Option<&Student> {
        match &self.profile {
            Some(RoleProfile::Student(student)) => Some(student),
            _ => None,
        }
    }

    pub fn teacher(&self) -> Option<&Teacher> {
        match &self.profile {
            Some(RoleProfile::Teacher(teacher)) => Some(teacher),
            _ => None,
        }
    }

    pub fn admin(&self) -> Option<&Admin> {
        match &self.profile {
            Some(RoleProfile::Admin(admin)) => Some(admin),
            _ => None,
        }
    }
}
