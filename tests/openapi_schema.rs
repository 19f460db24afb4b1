use serde_json::Value;

#[test]
fn openapi_documents_every_route_with_security_schemes() -> anyhow::Result<()> {
    // Build the OpenAPI document the same way the server does
    let doc = keen_eye::docs::build_openapi(8000)?;
    let v = serde_json::to_value(&doc)?;

    let paths = v
        .get("paths")
        .and_then(Value::as_object)
        .ok_or_else(|| anyhow::anyhow!("paths must exist"))?;

    let expected = [
        "/api/health",
        "/api/login",
        "/api/refresh-token",
        "/api/me",
        "/api/create-user",
        "/api/read-all-students",
        "/api/read-all-students-by-group-id",
        "/api/read-student",
        "/api/update-student",
        "/api/delete-student",
        "/api/read-all-teachers",
        "/api/read-teacher",
        "/api/update-teacher",
        "/api/delete-teacher",
        "/api/read-admin",
        "/api/update-admin",
        "/api/delete-admin",
        "/api/create-group",
        "/api/read-all-groups",
        "/api/read-group",
        "/api/update-group",
        "/api/delete-group",
    ];
    for path in expected {
        assert!(paths.contains_key(path), "OpenAPI missing path '{}'", path);
    }

    let student = v
        .pointer("/components/schemas/Student/properties")
        .and_then(Value::as_object)
        .ok_or_else(|| anyhow::anyhow!("Student schema must exist"))?;
    for key in ["id", "full_name", "phone_number", "group_id", "group_name"] {
        assert!(student.contains_key(key), "Student schema missing '{}'", key);
    }

    assert!(v.pointer("/components/securitySchemes/basicAuth").is_some());
    assert!(v.pointer("/components/securitySchemes/bearerAuth").is_some());

    Ok(())
}
