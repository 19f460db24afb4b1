use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Teacher {
    pub id: i64,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTeacherRequest {
    pub id: i64,
    #[schema(example = "Ivan Sokolov")]
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

impl UpdateTeacherRequest {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.phone_number.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TeacherResponse {
    pub teacher: Teacher,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TeachersResponse {
    pub teachers: Vec<Teacher>,
}
