use super::gate::RoleSet;
use super::principal::Principal;
use crate::errors::AppError;
use crate::models::user::Role;

/// A guarded resource operation together with the request data its ownership rule needs.
///
/// Lookups (a group's teacher, a target student's group) are done by the handler
/// before evaluation so the rules themselves stay pure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CreateUser,

    ReadAllStudents,
    ReadStudentsByGroup {
        group_id: i64,
        /// `teacher_id` of the requested group, if it exists and has one.
        group_teacher_id: Option<i64>,
    },
    ReadStudent {
        student_id: i64,
        /// Group of the requested student, if the student exists.
        target_group_id: Option<i64>,
        /// `teacher_id` of that group.
        group_teacher_id: Option<i64>,
    },
    UpdateStudent {
        student_id: i64,
    },
    DeleteStudent,

    ReadAllTeachers,
    ReadTeacher {
        teacher_id: i64,
    },
    UpdateTeacher {
        teacher_id: i64,
    },
    DeleteTeacher,

    ReadAdmin,
    UpdateAdmin,
    DeleteAdmin,

    CreateGroup,
    ReadAllGroups,
    ReadGroup {
        group_id: i64,
        group_teacher_id: Option<i64>,
    },
    UpdateGroup,
    DeleteGroup,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateUser => "user.create",
            Operation::ReadAllStudents => "student.read_all",
            Operation::ReadStudentsByGroup { .. } => "student.read_by_group",
            Operation::ReadStudent { .. } => "student.read",
            Operation::UpdateStudent { .. } => "student.update",
            Operation::DeleteStudent => "student.delete",
            Operation::ReadAllTeachers => "teacher.read_all",
            Operation::ReadTeacher { .. } => "teacher.read",
            Operation::UpdateTeacher { .. } => "teacher.update",
            Operation::DeleteTeacher => "teacher.delete",
            Operation::ReadAdmin => "admin.read",
            Operation::UpdateAdmin => "admin.update",
            Operation::DeleteAdmin => "admin.delete",
            Operation::CreateGroup => "group.create",
            Operation::ReadAllGroups => "group.read_all",
            Operation::ReadGroup { .. } => "group.read",
            Operation::UpdateGroup => "group.update",
            Operation::DeleteGroup => "group.delete",
        }
    }

    pub fn allowed_roles(&self) -> RoleSet {
        match self {
            Operation::ReadStudentsByGroup { .. }
            | Operation::ReadStudent { .. }
            | Operation::UpdateStudent { .. }
            | Operation::ReadGroup { .. } => RoleSet::ANY,
            Operation::ReadTeacher { .. } | Operation::UpdateTeacher { .. } => RoleSet::TEACHER_ADMIN,
            Operation::CreateUser
            | Operation::ReadAllStudents
            | Operation::DeleteStudent
            | Operation::ReadAllTeachers
            | Operation::DeleteTeacher
            | Operation::ReadAdmin
            | Operation::UpdateAdmin
            | Operation::DeleteAdmin
            | Operation::CreateGroup
            | Operation::ReadAllGroups
            | Operation::UpdateGroup
            | Operation::DeleteGroup => RoleSet::ADMIN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Forbidden(&'static str),
}

impl Decision {
    fn from_predicate(holds: bool) -> Self {
        if holds {
            Decision::Allow
        } else {
            Decision::Forbidden("Access denied: resource not owned")
        }
    }
}

const MISSING_PROFILE: Decision = Decision::Forbidden("Access denied: role profile missing");

/// Role check first, then the ownership predicate for the caller's role.
pub fn evaluate(principal: &Principal, op: &Operation) -> Decision {
    let role = principal.role();
    if !op.allowed_roles().allows(role) {
        return Decision::Forbidden("Access denied: insufficient role");
    }

    match role {
        // Admins need no profile, so a soft-deleted admin profile keeps access.
        Role::Admin => Decision::Allow,
        Role::Student => match principal.student() {
            Some(student) => student_rule(op, student.id, student.group_id),
            None => MISSING_PROFILE,
        },
        Role::Teacher => match principal.teacher() {
            Some(teacher) => teacher_rule(op, teacher.id),
            None => MISSING_PROFILE,
        },
    }
}

fn student_rule(op: &Operation, own_id: i64, own_group: Option<i64>) -> Decision {
    match op {
        Operation::ReadStudentsByGroup { group_id, .. } | Operation::ReadGroup { group_id, .. } => {
            Decision::from_predicate(own_group == Some(*group_id))
        }
        Operation::ReadStudent {
            student_id,
            target_group_id,
            ..
        } => Decision::from_predicate(own_id == *student_id && own_group == *target_group_id),
        Operation::UpdateStudent { student_id } => Decision::from_predicate(own_id == *student_id),
        // Unreachable past the role check; deny rather than assume.
        _ => Decision::Forbidden("Access denied: insufficient role"),
    }
}

fn teacher_rule(op: &Operation, own_id: i64) -> Decision {
    match op {
        Operation::ReadStudentsByGroup { group_teacher_id, .. }
        | Operation::ReadStudent { group_teacher_id, .. }
        | Operation::ReadGroup { group_teacher_id, .. } => {
            Decision::from_predicate(*group_teacher_id == Some(own_id))
        }
        Operation::UpdateStudent { .. } => Decision::Allow,
        Operation::ReadTeacher { teacher_id } | Operation::UpdateTeacher { teacher_id } => {
            Decision::from_predicate(own_id == *teacher_id)
        }
        _ => Decision::Forbidden("Access denied: insufficient role"),
    }
}

/// Evaluates `op` and turns a denial into a 403.
pub fn authorize(principal: &Principal, op: &Operation) -> Result<(), AppError> {
    match evaluate(principal, op) {
        Decision::Allow => Ok(()),
        Decision::Forbidden(reason) => {
            tracing::debug!(
                user_id = principal.id(),
                role = %principal.role(),
                operation = op.name(),
                reason,
                "authorization denied"
            );
            Err(AppError::forbidden(reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::principal::RoleProfile;
    use crate::models::admin::Admin;
    use crate::models::student::Student;
    use crate::models::teacher::Teacher;
    use crate::models::user::Credential;

    fn credential(id: i64, role: Role) -> Credential {
        Credential {
            id,
            login: format!("user{id}"),
            role,
        }
    }

    fn student(id: i64, group_id: Option<i64>) -> Principal {
        Principal::new(credential(id, Role::Student)).with_profile(RoleProfile::Student(Student {
            id,
            full_name: None,
            phone_number: None,
            group_id,
            group_name: None,
        }))
    }

    fn teacher(id: i64) -> Principal {
        Principal::new(credential(id, Role::Teacher)).with_profile(RoleProfile::Teacher(Teacher {
            id,
            full_name: None,
            phone_number: None,
        }))
    }

    fn admin(id: i64) -> Principal {
        Principal::new(credential(id, Role::Admin)).with_profile(RoleProfile::Admin(Admin {
            id,
            full_name: None,
            phone_number: None,
        }))
    }

    #[test]
    fn admin_only_operations_reject_other_roles() {
        let ops = [
            Operation::CreateUser,
            Operation::ReadAllStudents,
            Operation::DeleteStudent,
            Operation::ReadAllTeachers,
            Operation::DeleteTeacher,
            Operation::ReadAdmin,
            Operation::UpdateAdmin,
            Operation::DeleteAdmin,
            Operation::CreateGroup,
            Operation::ReadAllGroups,
            Operation::UpdateGroup,
            Operation::DeleteGroup,
        ];

        for op in &ops {
            assert_eq!(evaluate(&admin(1), op), Decision::Allow, "{}", op.name());
            assert_ne!(evaluate(&teacher(2), op), Decision::Allow, "{}", op.name());
            assert_ne!(evaluate(&student(3, Some(1)), op), Decision::Allow, "{}", op.name());
        }
    }

    #[test]
    fn student_reads_only_own_group() {
        let principal = student(10, Some(4));
        let own = Operation::ReadStudentsByGroup {
            group_id: 4,
            group_teacher_id: None,
        };
        let other = Operation::ReadStudentsByGroup {
            group_id: 5,
            group_teacher_id: None,
        };

        assert_eq!(evaluate(&principal, &own), Decision::Allow);
        assert!(matches!(evaluate(&principal, &other), Decision::Forbidden(_)));
    }

    #[test]
    fn student_without_group_reads_no_group() {
        let op = Operation::ReadGroup {
            group_id: 1,
            group_teacher_id: Some(2),
        };
        assert!(matches!(evaluate(&student(10, None), &op), Decision::Forbidden(_)));
    }

    #[test]
    fn teacher_reads_group_they_teach() {
        let principal = teacher(7);
        let taught = Operation::ReadStudentsByGroup {
            group_id: 1,
            group_teacher_id: Some(7),
        };
        let foreign = Operation::ReadStudentsByGroup {
            group_id: 2,
            group_teacher_id: Some(8),
        };
        let unassigned = Operation::ReadStudentsByGroup {
            group_id: 3,
            group_teacher_id: None,
        };

        assert_eq!(evaluate(&principal, &taught), Decision::Allow);
        assert!(matches!(evaluate(&principal, &foreign), Decision::Forbidden(_)));
        assert!(matches!(evaluate(&principal, &unassigned), Decision::Forbidden(_)));
    }

    #[test]
    fn student_reads_only_self() {
        let principal = student(10, Some(4));
        let own = Operation::ReadStudent {
            student_id: 10,
            target_group_id: Some(4),
            group_teacher_id: None,
        };
        let classmate = Operation::ReadStudent {
            student_id: 11,
            target_group_id: Some(4),
            group_teacher_id: None,
        };
        let stranger = Operation::ReadStudent {
            student_id: 12,
            target_group_id: Some(9),
            group_teacher_id: None,
        };
        let missing = Operation::ReadStudent {
            student_id: 99,
            target_group_id: None,
            group_teacher_id: None,
        };

        assert_eq!(evaluate(&principal, &own), Decision::Allow);
        assert!(matches!(evaluate(&principal, &classmate), Decision::Forbidden(_)));
        assert!(matches!(evaluate(&principal, &stranger), Decision::Forbidden(_)));
        assert!(matches!(evaluate(&principal, &missing), Decision::Forbidden(_)));
    }

    #[test]
    fn teacher_reads_students_of_taught_group() {
        let principal = teacher(7);
        let taught = Operation::ReadStudent {
            student_id: 5,
            target_group_id: Some(1),
            group_teacher_id: Some(7),
        };
        let foreign = Operation::ReadStudent {
            student_id: 5,
            target_group_id: Some(2),
            group_teacher_id: Some(8),
        };

        assert_eq!(evaluate(&principal, &taught), Decision::Allow);
        assert!(matches!(evaluate(&principal, &foreign), Decision::Forbidden(_)));
    }

    #[test]
    fn student_updates_only_self_teacher_and_admin_update_anyone() {
        let op = Operation::UpdateStudent { student_id: 10 };

        assert_eq!(evaluate(&student(10, Some(1)), &op), Decision::Allow);
        assert!(matches!(evaluate(&student(11, Some(1)), &op), Decision::Forbidden(_)));
        assert_eq!(evaluate(&teacher(7), &op), Decision::Allow);
        assert_eq!(evaluate(&admin(1), &op), Decision::Allow);
    }

    #[test]
    fn teacher_reads_and_updates_only_self() {
        let principal = teacher(7);

        assert_eq!(evaluate(&principal, &Operation::ReadTeacher { teacher_id: 7 }), Decision::Allow);
        assert_eq!(evaluate(&principal, &Operation::UpdateTeacher { teacher_id: 7 }), Decision::Allow);
        assert!(matches!(
            evaluate(&principal, &Operation::ReadTeacher { teacher_id: 8 }),
            Decision::Forbidden(_)
        ));
        assert!(matches!(
            evaluate(&principal, &Operation::UpdateTeacher { teacher_id: 8 }),
            Decision::Forbidden(_)
        ));
        assert_eq!(evaluate(&admin(1), &Operation::UpdateTeacher { teacher_id: 8 }), Decision::Allow);
    }

    #[test]
    fn student_cannot_touch_teachers() {
        let op = Operation::ReadTeacher { teacher_id: 10 };
        assert!(matches!(evaluate(&student(10, None), &op), Decision::Forbidden(_)));
    }

    #[test]
    fn missing_profile_is_forbidden_for_ownership_rules() {
        let bare_student = Principal::new(credential(10, Role::Student));
        let op = Operation::UpdateStudent { student_id: 10 };
        assert_eq!(evaluate(&bare_student, &op), MISSING_PROFILE);

        let bare_teacher = Principal::new(credential(7, Role::Teacher));
        assert_eq!(evaluate(&bare_teacher, &Operation::ReadTeacher { teacher_id: 7 }), MISSING_PROFILE);
    }

    #[test]
    fn admin_role_needs_no_profile() {
        let bare_admin = Principal::new(credential(1, Role::Admin));
        assert_eq!(evaluate(&bare_admin, &Operation::DeleteAdmin), Decision::Allow);
    }

    #[test]
    fn authorize_maps_denial_to_forbidden() {
        let err = authorize(&student(10, None), &Operation::CreateUser).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(authorize(&admin(1), &Operation::CreateUser).is_ok());
    }
}
