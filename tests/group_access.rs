mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{basic, TestApp, PASSWORD};
use keen_eye::models::user::Role;

#[tokio::test]
async fn admin_group_lifecycle() -> Result<()> {
    let t = TestApp::new().await?;
    let root = t.bearer(t.user("root", Role::Admin, None).await?)?;
    let teacher = t.user("t.one", Role::Teacher, None).await?;

    let (status, created) = t
        .json("POST", "/api/create-group", Some(&root), json!({"name": "CS-101", "teacher_id": teacher}))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap_or_default();

    let (status, body) = t.get(&format!("/api/read-group?id={id}"), &root).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["group"], json!({"id": id, "name": "CS-101", "teacher_id": teacher}));

    let (status, body) = t
        .json("PUT", "/api/update-group", Some(&root), json!({"id": id, "name": "CS-102"}))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["group"]["name"], "CS-102");
    assert_eq!(body["group"]["teacher_id"], teacher);

    let (status, body) = t.get("/api/read-all-groups", &root).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["groups"].as_array().map(Vec::len), Some(1));

    let (status, _) = t.delete(&format!("/api/delete-group?id={id}"), &root).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = t.get("/api/read-all-groups", &root).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["groups"], json!([]));

    let (status, _) = t
        .json("PUT", "/api/update-group", Some(&root), json!({"id": id, "name": "again"}))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn update_group_can_unassign_teacher() -> Result<()> {
    let t = TestApp::new().await?;
    let root = t.bearer(t.user("root", Role::Admin, None).await?)?;
    let teacher = t.user("t.one", Role::Teacher, None).await?;
    let group = t.group("G-1", Some(teacher)).await?;

    // an absent teacher_id leaves the assignment alone
    let (status, body) = t
        .json("PUT", "/api/update-group", Some(&root), json!({"id": group, "name": "G-2"}))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["group"]["teacher_id"], teacher);

    let (status, body) = t
        .json("PUT", "/api/update-group", Some(&root), json!({"id": group, "teacher_id": null}))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["group"], json!({"id": group, "name": "G-2", "teacher_id": null}));

    // the former teacher no longer owns it
    let (status, _) = t
        .get(&format!("/api/read-group?id={group}"), &basic("t.one", PASSWORD))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn create_group_validates_input() -> Result<()> {
    let t = TestApp::new().await?;
    let root = t.bearer(t.user("root", Role::Admin, None).await?)?;

    let (status, _) = t
        .json("POST", "/api/create-group", Some(&root), json!({"name": "  "}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t
        .json("POST", "/api/create-group", Some(&root), json!({"name": "G", "teacher_id": 77}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t
        .json("PUT", "/api/update-group", Some(&root), json!({"id": 1}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn read_group_follows_membership_and_teaching() -> Result<()> {
    let t = TestApp::new().await?;
    let one = t.user("t.one", Role::Teacher, None).await?;
    t.user("t.two", Role::Teacher, None).await?;
    let group = t.group("G-1", Some(one)).await?;
    let other = t.group("G-2", None).await?;
    t.user("alice", Role::Student, Some(group)).await?;

    let checks = [
        ("alice", group, StatusCode::OK),
        ("alice", other, StatusCode::FORBIDDEN),
        ("t.one", group, StatusCode::OK),
        ("t.two", group, StatusCode::FORBIDDEN),
        // a group with no teacher belongs to no teacher
        ("t.one", other, StatusCode::FORBIDDEN),
    ];

    for (login, id, expected) in checks {
        let (status, _) = t.get(&format!("/api/read-group?id={id}"), &basic(login, PASSWORD)).await?;
        assert_eq!(status, expected, "{login} reading group {id}");
    }

    Ok(())
}

#[tokio::test]
async fn group_mutations_are_admin_only() -> Result<()> {
    let t = TestApp::new().await?;
    let one = t.user("t.one", Role::Teacher, None).await?;
    let group = t.group("G-1", Some(one)).await?;
    let teacher = basic("t.one", PASSWORD);

    let (status, _) = t
        .json("POST", "/api/create-group", Some(&teacher), json!({"name": "mine"}))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t
        .json("PUT", "/api/update-group", Some(&teacher), json!({"id": group, "name": "mine"}))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t.delete(&format!("/api/delete-group?id={group}"), &teacher).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t.get("/api/read-all-groups", &teacher).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    Ok(())
}
