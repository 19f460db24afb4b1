use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::models;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
	paths(
		routes::health::health,
		routes::auth::login,
		routes::auth::refresh_token,
		routes::auth::me,
		routes::users::create_user,
		routes::students::read_all_students,
		routes::students::read_students_by_group,
		routes::students::read_student,
		routes::students::update_student,
		routes::students::delete_student,
		routes::teachers::read_all_teachers,
		routes::teachers::read_teacher,
		routes::teachers::update_teacher,
		routes::teachers::delete_teacher,
		routes::admins::read_admin,
		routes::admins::update_admin,
		routes::admins::delete_admin,
		routes::groups::create_group,
		routes::groups::read_all_groups,
		routes::groups::read_group,
		routes::groups::update_group,
		routes::groups::delete_group
	),
	components(
		schemas(
			routes::health::HealthResponse,
			models::CreatedResponse,
			models::user::Role,
			models::user::Credential,
			models::user::CreateUserRequest,
			models::user::LoginRequest,
			models::user::RefreshTokenRequest,
			models::user::TokenResponse,
			models::user::MeResponse,
			models::student::Student,
			models::student::UpdateStudentRequest,
			models::student::StudentResponse,
			models::student::StudentsResponse,
			models::teacher::Teacher,
			models::teacher::UpdateTeacherRequest,
			models::teacher::TeacherResponse,
			models::teacher::TeachersResponse,
			models::admin::Admin,
			models::admin::UpdateAdminRequest,
			models::admin::AdminResponse,
			models::group::Group,
			models::group::CreateGroupRequest,
			models::group::UpdateGroupRequest,
			models::group::GroupResponse,
			models::group::GroupsResponse
		)
	),
	modifiers(&SecurityAddon),
	tags(
		(name = "Health", description = "Liveness"),
		(name = "Auth", description = "Login, token refresh and the current principal"),
		(name = "Users", description = "Account creation"),
		(name = "Students", description = "Student profiles"),
		(name = "Teachers", description = "Teacher profiles"),
		(name = "Admins", description = "Admin profiles"),
		(name = "Groups", description = "Study groups")
	)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
	fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
		let components = openapi.components.get_or_insert_with(Default::default);
		components.add_security_scheme(
			"basicAuth",
			SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
		);
		components.add_security_scheme(
			"bearerAuth",
			SecurityScheme::Http(
				HttpBuilder::new()
					.scheme(HttpAuthScheme::Bearer)
					.bearer_format("JWT")
					.build(),
			),
		);
	}
}

/// The served document: the derived OpenAPI plus request examples and a local server entry.
pub fn build_openapi(port: u16) -> anyhow::Result<utoipa::openapi::OpenApi> {
	let mut doc = serde_json::to_value(ApiDoc::openapi())?;

	add_request_examples(&mut doc);
	ensure_servers(&mut doc, port);

	Ok(serde_json::from_value(doc)?)
}

pub fn swagger_routes(doc: utoipa::openapi::OpenApi) -> anyhow::Result<Router> {
	let swagger_config = utoipa_swagger_ui::Config::new(["/api-docs/openapi.json"])
		.try_it_out_enabled(true)
		.with_credentials(true)
		.persist_authorization(true);

	let doc_json = Arc::new(serde_json::to_value(&doc)?);

	let json_route = get(move || {
		let doc_json = Arc::clone(&doc_json);
		async move { Json((*doc_json).clone()) }
	});

	Ok(Router::new()
		.route("/api-docs/openapi.json", json_route)
		.merge(SwaggerUi::new("/docs").config(swagger_config)))
}

fn add_request_examples(doc: &mut Value) {
	let Some(paths) = doc.get_mut("paths").and_then(Value::as_object_mut) else { return; };

	for item in paths.values_mut() {
		let Some(operations) = item.as_object_mut() else { continue; };
		for operation in operations.values_mut() {
			apply_request_example(operation);
		}
	}
}

fn apply_request_example(operation: &mut Value) {
	let Some(app_json) = operation
		.pointer_mut("/requestBody/content/application~1json")
		.and_then(Value::as_object_mut)
	else {
		return;
	};
	let Some(reference) = app_json.get("schema").and_then(|s| s.get("$ref")).and_then(Value::as_str) else { return; };

	let example = match reference {
		"#/components/schemas/LoginRequest" => json!({
			"login": "a.petrova",
			"password": "S3cureP@ssw0rd"
		}),
		"#/components/schemas/CreateUserRequest" => json!({
			"login": "a.petrova",
			"password": "S3cureP@ssw0rd",
			"role": "student",
			"full_name": "Anna Petrova",
			"phone_number": "+7 900 000 00 00",
			"group_id": 1
		}),
		"#/components/schemas/UpdateStudentRequest" => json!({
			"id": 2,
			"phone_number": "+7 900 111 22 33"
		}),
		"#/components/schemas/CreateGroupRequest" => json!({
			"name": "CS-101",
			"teacher_id": 3
		}),
		_ => return,
	};

	app_json.insert("example".to_string(), example);
}

fn ensure_servers(doc: &mut Value, port: u16) {
	let server_url = format!("http://localhost:{port}");

	match doc.get_mut("servers") {
		Some(Value::Array(servers)) => {
			let has = servers
				.iter()
				.any(|v| v.get("url").and_then(Value::as_str) == Some(server_url.as_str()));
			if !has {
				servers.push(json!({ "url": server_url }));
			}
		}
		_ => {
			doc["servers"] = json!([{ "url": server_url }]);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn declares_both_auth_schemes() {
		let doc = serde_json::to_value(build_openapi(8000).unwrap()).unwrap();
		let schemes = &doc["components"]["securitySchemes"];
		assert_eq!(schemes["basicAuth"]["scheme"], "basic");
		assert_eq!(schemes["bearerAuth"]["scheme"], "bearer");
	}

	#[test]
	fn login_request_has_example() {
		let doc = serde_json::to_value(build_openapi(8000).unwrap()).unwrap();
		let example = doc.pointer("/paths/~1api~1login/post/requestBody/content/application~1json/example");
		assert_eq!(example.and_then(|e| e.get("login")).and_then(Value::as_str), Some("a.petrova"));
	}
}
