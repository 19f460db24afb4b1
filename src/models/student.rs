use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i64,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub group_id: Option<i64>,
    /// Resolved from the referenced group; absent when the group is missing or deleted.
    pub group_name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStudentRequest {
    pub id: i64,
    #[schema(example = "Anna Petrova")]
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub group_id: Option<i64>,
}

impl UpdateStudentRequest {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.phone_number.is_none() && self.group_id.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    pub student: Student,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentsResponse {
    pub students: Vec<Student>,
}
