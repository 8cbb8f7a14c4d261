use org_directory_core::contract::{MessageBody, ORGANIZATION_ID_ATTRIBUTE};
use org_directory_core::error::RequestError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::adapters::directory_store::DirectoryStore;
use crate::handlers::organizations::{create_organization, update_organization};
use crate::handlers::users::{create_user, update_user};

const ORGANIZATIONS_SEGMENT: &str = "organizations";
const USERS_SEGMENT: &str = "users";
const ORG_ID_PATH_PARAMETER: &str = "orgId";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Route {
    CreateOrganization,
    UpdateOrganization,
    CreateUser { organization_id: String },
    UpdateUser { organization_id: String },
}

pub fn handle_http_event(event: Value, store: &dyn DirectoryStore) -> ApiGatewayResponse {
    let route = match resolve_route(&event) {
        Ok(value) => value,
        Err(response) => return response,
    };

    let mut payload = match normalize_apigw_body(&event) {
        Ok(value) => value,
        Err(message) => return request_error_response(&RequestError::validation(message)),
    };

    let outcome = match route {
        Route::CreateOrganization => create_organization(store, &payload)
            .and_then(|organization| serialize_record(201, &organization)),
        Route::UpdateOrganization => update_organization(store, &payload)
            .and_then(|organization| serialize_record(200, &organization)),
        Route::CreateUser { organization_id } => {
            scope_to_organization(&mut payload, organization_id);
            create_user(store, &payload).and_then(|user| serialize_record(201, &user))
        }
        Route::UpdateUser { organization_id } => {
            scope_to_organization(&mut payload, organization_id);
            update_user(store, &payload).and_then(|user| serialize_record(200, &user))
        }
    };

    match outcome {
        Ok((status_code, body)) => json_response(status_code, body),
        Err(error) => request_error_response(&error),
    }
}

fn resolve_route(event: &Value) -> Result<Route, ApiGatewayResponse> {
    let method = request_method(event).unwrap_or_default().to_ascii_uppercase();
    let path = request_path(event).unwrap_or_default();

    let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
    // At most one leading stage segment, e.g. `/prod/organizations`.
    let Some(start) = segments
        .iter()
        .take(2)
        .position(|segment| *segment == ORGANIZATIONS_SEGMENT)
    else {
        return Err(message_response(404, "Route not found"));
    };

    match &segments[start..] {
        [_] => match method.as_str() {
            "POST" => Ok(Route::CreateOrganization),
            "PUT" => Ok(Route::UpdateOrganization),
            _ => Err(message_response(405, "Method not allowed")),
        },
        [_, path_org_id, users] if *users == USERS_SEGMENT => {
            let organization_id = event
                .get("pathParameters")
                .and_then(|parameters| parameters.get(ORG_ID_PATH_PARAMETER))
                .and_then(Value::as_str)
                .unwrap_or(*path_org_id)
                .to_string();
            match method.as_str() {
                "POST" => Ok(Route::CreateUser { organization_id }),
                "PUT" => Ok(Route::UpdateUser { organization_id }),
                _ => Err(message_response(405, "Method not allowed")),
            }
        }
        _ => Err(message_response(404, "Route not found")),
    }
}

/// Method from a REST (`httpMethod`) or HTTP API v2 (`requestContext.http.method`) event.
fn request_method(event: &Value) -> Option<&str> {
    event
        .get("httpMethod")
        .and_then(Value::as_str)
        .or_else(|| {
            event
                .pointer("/requestContext/http/method")
                .and_then(Value::as_str)
        })
}

fn request_path(event: &Value) -> Option<&str> {
    event
        .get("path")
        .and_then(Value::as_str)
        .or_else(|| event.get("rawPath").and_then(Value::as_str))
}

fn normalize_apigw_body(event: &Value) -> Result<Value, String> {
    let body = match event.get("body") {
        None | Some(Value::Null) => return Ok(json!({})),
        Some(Value::Object(_)) => event["body"].clone(),
        Some(Value::String(text)) if text.trim().is_empty() => return Ok(json!({})),
        Some(Value::String(text)) => serde_json::from_str(text)
            .map_err(|error| format!("Malformed JSON body: {error}"))?,
        Some(_) => return Err("Request body must be a JSON object".to_string()),
    };

    if body.is_object() {
        Ok(body)
    } else {
        Err("Request body must be a JSON object".to_string())
    }
}

/// The path organization wins over any `organizationId` in the body.
fn scope_to_organization(payload: &mut Value, organization_id: String) {
    if let Some(object) = payload.as_object_mut() {
        object.insert(
            ORGANIZATION_ID_ATTRIBUTE.to_string(),
            Value::String(organization_id),
        );
    }
}

fn serialize_record(
    status_code: u16,
    record: &impl Serialize,
) -> Result<(u16, String), RequestError> {
    serde_json::to_string(record)
        .map(|body| (status_code, body))
        .map_err(|error| {
            RequestError::unexpected(format!("failed to serialize response: {error}"))
        })
}

fn request_error_response(request_error: &RequestError) -> ApiGatewayResponse {
    let status_code = request_error.status_code();
    if request_error.is_unexpected() {
        error!(status_code, error = %request_error, "request failed unexpectedly");
    } else {
        warn!(
            status_code,
            kind = request_error.kind(),
            error = %request_error,
            "request rejected"
        );
    }
    message_response(status_code, &request_error.to_string())
}

fn message_response(status_code: u16, message: &str) -> ApiGatewayResponse {
    json_response(status_code, json!(MessageBody::new(message)).to_string())
}

fn json_response(status_code: u16, body: String) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingStore;

    fn body_json(response: &ApiGatewayResponse) -> Value {
        serde_json::from_str(&response.body).expect("response body should be json")
    }

    #[test]
    fn post_organizations_creates_record() {
        let store = RecordingStore::new();
        let response = handle_http_event(
            json!({
                "httpMethod": "POST",
                "path": "/organizations",
                "body": "{\"name\":\"Acme\",\"description\":\"desc\"}"
            }),
            &store,
        );

        assert_eq!(response.status_code, 201);
        let body = body_json(&response);
        assert_eq!(body["name"], json!("Acme"));
        assert_eq!(body["description"], json!("desc"));
        let organization_id = body["organizationId"]
            .as_str()
            .expect("organizationId should be a string");
        assert_eq!(organization_id.len(), 36);
        assert!(store.organization(organization_id).is_some());
    }

    #[test]
    fn post_users_against_unknown_organization_is_bad_request() {
        let store = RecordingStore::new();
        let response = handle_http_event(
            json!({
                "httpMethod": "POST",
                "path": "/organizations/org-404/users",
                "pathParameters": {"orgId": "org-404"},
                "body": "{\"name\":\"Bob\",\"email\":\"bob@x.com\"}"
            }),
            &store,
        );

        assert_eq!(response.status_code, 400);
        let message = body_json(&response)["message"]
            .as_str()
            .expect("message should be a string")
            .to_string();
        assert!(message.contains("org-404"));
        assert_eq!(store.user_count(), 0);
    }

    #[test]
    fn path_organization_overrides_body_value() {
        let store = RecordingStore::new().with_organization("o1", "Acme", "desc");
        let response = handle_http_event(
            json!({
                "requestContext": {"http": {"method": "POST"}},
                "rawPath": "/prod/organizations/o1/users",
                "body": {"name": "Bob", "email": "bob@x.com", "organizationId": "o2"}
            }),
            &store,
        );

        assert_eq!(response.status_code, 201);
        assert_eq!(body_json(&response)["organizationId"], json!("o1"));
    }

    #[test]
    fn put_users_maps_ownership_mismatch_to_forbidden() {
        let store = RecordingStore::new()
            .with_organization("o1", "Acme", "desc")
            .with_organization("o2", "Globex", "desc")
            .with_user("u1", "o1", "Bob", "bob@x.com");
        let response = handle_http_event(
            json!({
                "httpMethod": "PUT",
                "path": "/organizations/o2/users",
                "pathParameters": {"orgId": "o2"},
                "body": "{\"userId\":\"u1\",\"name\":\"Robert\"}"
            }),
            &store,
        );

        assert_eq!(response.status_code, 403);
    }

    #[test]
    fn put_users_returns_updated_record() {
        let store = RecordingStore::new()
            .with_organization("o1", "Acme", "desc")
            .with_user("u1", "o1", "Bob", "bob@x.com");
        let response = handle_http_event(
            json!({
                "httpMethod": "PUT",
                "path": "/organizations/o1/users",
                "pathParameters": {"orgId": "o1"},
                "body": "{\"userId\":\"u1\",\"email\":\"robert@x.com\"}"
            }),
            &store,
        );

        assert_eq!(response.status_code, 200);
        assert_eq!(
            body_json(&response),
            json!({
                "userId": "u1",
                "organizationId": "o1",
                "name": "Bob",
                "email": "robert@x.com",
            })
        );
    }

    #[test]
    fn put_users_for_unknown_user_is_not_found() {
        let store = RecordingStore::new().with_organization("o1", "Acme", "desc");
        let response = handle_http_event(
            json!({
                "httpMethod": "PUT",
                "path": "/organizations/o1/users",
                "pathParameters": {"orgId": "o1"},
                "body": "{\"userId\":\"u9\",\"name\":\"Robert\"}"
            }),
            &store,
        );

        assert_eq!(response.status_code, 404);
        assert_eq!(
            body_json(&response),
            json!({"message": "User with id u9 not found"})
        );
        assert!(store.writes().is_empty());
    }

    #[test]
    fn put_organizations_returns_updated_record() {
        let store = RecordingStore::new().with_organization("o1", "Acme", "desc");
        let response = handle_http_event(
            json!({
                "httpMethod": "PUT",
                "path": "/organizations",
                "body": "{\"organizationId\":\"o1\",\"name\":\"Acme Corp\"}"
            }),
            &store,
        );

        assert_eq!(response.status_code, 200);
        assert_eq!(body_json(&response)["name"], json!("Acme Corp"));
    }

    #[test]
    fn put_unknown_organization_is_not_found() {
        let store = RecordingStore::new();
        let response = handle_http_event(
            json!({
                "httpMethod": "PUT",
                "path": "/organizations",
                "body": "{\"organizationId\":\"o1\",\"name\":\"Acme\"}"
            }),
            &store,
        );

        assert_eq!(response.status_code, 404);
    }

    #[test]
    fn validation_failures_join_all_messages() {
        let store = RecordingStore::new();
        let response = handle_http_event(
            json!({ "httpMethod": "POST", "path": "/organizations" }),
            &store,
        );

        assert_eq!(response.status_code, 400);
        assert_eq!(
            body_json(&response),
            json!({"message": "\"name\" is required. \"description\" is required"})
        );
    }

    #[test]
    fn rejects_malformed_json_body() {
        let store = RecordingStore::new();
        let response = handle_http_event(
            json!({ "httpMethod": "POST", "path": "/organizations", "body": "{oops" }),
            &store,
        );

        assert_eq!(response.status_code, 400);
        assert!(body_json(&response)["message"]
            .as_str()
            .expect("message should be a string")
            .starts_with("Malformed JSON body"));
    }

    #[test]
    fn rejects_non_object_body() {
        let store = RecordingStore::new();
        let response = handle_http_event(
            json!({ "httpMethod": "POST", "path": "/organizations", "body": "[1,2]" }),
            &store,
        );

        assert_eq!(response.status_code, 400);
    }

    #[test]
    fn unknown_routes_and_methods() {
        let store = RecordingStore::new();

        let missing = handle_http_event(json!({ "httpMethod": "GET", "path": "/teams" }), &store);
        assert_eq!(missing.status_code, 404);

        let nested = handle_http_event(
            json!({
                "httpMethod": "POST",
                "path": "/teams/x/organizations",
                "body": "{\"name\":\"Acme\",\"description\":\"desc\"}"
            }),
            &store,
        );
        assert_eq!(nested.status_code, 404);
        assert_eq!(store.organization_count(), 0);

        let wrong_method =
            handle_http_event(json!({ "httpMethod": "DELETE", "path": "/organizations" }), &store);
        assert_eq!(wrong_method.status_code, 405);
    }

    #[test]
    fn store_outage_is_internal_error_with_message() {
        let store = RecordingStore::unavailable();
        let response = handle_http_event(
            json!({
                "httpMethod": "POST",
                "path": "/organizations",
                "body": "{\"name\":\"Acme\",\"description\":\"desc\"}"
            }),
            &store,
        );

        assert_eq!(response.status_code, 500);
        assert!(body_json(&response)["message"]
            .as_str()
            .expect("message should be a string")
            .contains("simulated store outage"));
    }
}
