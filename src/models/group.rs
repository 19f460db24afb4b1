use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Group {
    pub id: i64,
    pub name: String,
    /// A group may have no assigned teacher.
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    #[schema(example = "CS-101")]
    pub name: String,
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateGroupRequest {
    pub id: i64,
    pub name: Option<String>,
    /// Absent leaves the teacher as is; `null` unassigns it.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i64>)]
    pub teacher_id: Option<Option<i64>>,
}

/// Wraps any present value, `null` included, in `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl UpdateGroupRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.teacher_id.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GroupResponse {
    pub group: Group,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GroupsResponse {
    pub groups: Vec<Group>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn update_distinguishes_absent_and_null_teacher() {
        let absent: UpdateGroupRequest = serde_json::from_value(json!({"id": 1, "name": "G"})).unwrap();
        let cleared: UpdateGroupRequest = serde_json::from_value(json!({"id": 1, "teacher_id": null})).unwrap();
        let set: UpdateGroupRequest = serde_json::from_value(json!({"id": 1, "teacher_id": 4})).unwrap();

        assert_eq!(absent.teacher_id, None);
        assert_eq!(cleared.teacher_id, Some(None));
        assert!(!cleared.is_empty());
        assert_eq!(set.teacher_id, Some(Some(4)));
    }
}
