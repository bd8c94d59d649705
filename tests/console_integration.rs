//! End-to-end tests through the HTTP router.
//!
//! Most tests run against the in-memory backend; the last group points the
//! console at a wiremock server to check what goes over the wire.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use tower::ServiceExt;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lending_admin_console::client::{create_backend, AdminBackend, Fault, MemoryBackend};
use lending_admin_console::config::{BackendConfig, Settings};
use lending_admin_console::server::{create_app, AppState};
use lending_admin_console::template::suggested_templates;

fn app_with(backend: Arc<dyn AdminBackend>, settings: Settings) -> Router {
    create_app(AppState::new(settings, backend))
}

fn memory_app() -> (Arc<MemoryBackend>, Router) {
    let backend = Arc::new(MemoryBackend::with_demo_data());
    let app = app_with(backend.clone(), Settings::default());
    (backend, app)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn call_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = call(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

// ============================================================================
// Health & auth
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (_, app) = memory_app();
    let (status, body) = call_json(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"]["kind"], "memory");
}

#[tokio::test]
async fn test_api_key_guards_v1_only() {
    let mut settings = Settings::default();
    settings.api.key = Some("console-key".to_string());
    let app = app_with(Arc::new(MemoryBackend::with_demo_data()), settings);

    let (status, _) = call(&app, Method::GET, "/api/v1/templates", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/api/v1/templates")
        .header("X-API-Key", "console-key")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

// ============================================================================
// Templates
// ============================================================================

#[tokio::test]
async fn test_provision_replace_then_list() {
    let (_, app) = memory_app();

    let (status, report) = call_json(
        &app,
        Method::POST,
        "/api/v1/templates/provision",
        Some(json!({"mode": "replace"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let expected = suggested_templates().len();
    assert_eq!(report["created"], expected);

    let (_, list) = call_json(&app, Method::GET, "/api/v1/templates", None).await;
    assert_eq!(list["total"], expected);
    let preview = list["templates"][0]["preview"].as_str().unwrap();
    assert!(!preview.contains("{{"));

    let (_, sms) = call_json(&app, Method::GET, "/api/v1/templates?channel=SMS", None).await;
    assert!(sms["total"].as_u64().unwrap() < expected as u64);
}

#[tokio::test]
async fn test_provision_failure_reports_partial_progress() {
    let (backend, app) = memory_app();
    backend.fail_on_call("create_template", 3, Fault::rejected(500, "Server Error"));

    let (status, report) = call_json(
        &app,
        Method::POST,
        "/api/v1/templates/provision",
        Some(json!({"mode": "keep"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(report["created"], 2);
    assert_eq!(report["deleted"], 0);
    assert!(report["message"].as_str().unwrap().contains("servidor"));
    assert_eq!(backend.template_count(), 2);
}

#[tokio::test]
async fn test_preview_unsaved_content() {
    let (_, app) = memory_app();
    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/v1/templates/preview",
        Some(json!({
            "event": "application_approved",
            "channel": "SMS",
            "body": "Hola {{applicant.first_name}}, tu folio {{application.folio}} fue aprobado.",
            "html_body": "<p>No permitido</p>"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["body"].as_str().unwrap().contains("{{"));
    assert_eq!(body["html_text"], "No permitido");
    let kinds: Vec<&str> = body["advisories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["kind"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"html_not_supported"));
}

#[tokio::test]
async fn test_create_succeeds_when_cache_refresh_fails() {
    let (backend, app) = memory_app();
    backend.fail("list_templates", Fault::Transport);

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/v1/templates",
        Some(json!({
            "name": "OTP SMS",
            "event": "otp_verification",
            "channel": "SMS",
            "body": "Tu código es {{otp.code}}"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(backend.template_count(), 1);
    let id = body["template"]["id"].as_u64().unwrap();

    let (status, _) = call(&app, Method::GET, &format!("/api/v1/templates/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_template_is_404() {
    let (_, app) = memory_app();
    let (status, body) = call_json(&app, Method::GET, "/api/v1/templates/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "TEMPLATE_NOT_FOUND");
}

// ============================================================================
// Applications
// ============================================================================

#[tokio::test]
async fn test_bulk_assign_aggregates_failures() {
    let (backend, app) = memory_app();
    backend.fail_for("assign_application", 2, Fault::Transport);

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/v1/applications/bulk-assign",
        Some(json!({"application_ids": [1, 2, 3], "assignee_id": 2})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["succeeded"], 2);
    assert_eq!(body["failed"], 1);
    assert_eq!(body["failures"][0]["id"], 2);
}

#[tokio::test]
async fn test_bulk_reject_requires_reason() {
    let (backend, app) = memory_app();
    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/v1/applications/bulk-reject",
        Some(json!({"application_ids": [1], "reason": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(backend.calls("reject_application"), 0);
}

#[tokio::test]
async fn test_list_applications_with_filters() {
    let (_, app) = memory_app();
    let (status, body) = call_json(
        &app,
        Method::GET,
        "/api/v1/applications?status=SUBMITTED&assignment=unassigned",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["applicant"]["first_name"], "María");
}

#[tokio::test]
async fn test_export_csv() {
    let (_, app) = memory_app();

    let request = Request::builder()
        .uri("/api/v1/applications/export?status=SUBMITTED")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(response.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .contains("solicitudes_"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    assert_eq!(text.split_terminator("\r\n").count(), 3);
}

// ============================================================================
// Users, tenants, providers
// ============================================================================

#[tokio::test]
async fn test_delete_user_with_assignments_is_refused() {
    let (_, app) = memory_app();
    let (status, body) = call_json(&app, Method::DELETE, "/api/v1/users/2", None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"]["message"],
        "No se puede eliminar un usuario con solicitudes asignadas."
    );

    let (status, _) = call(&app, Method::DELETE, "/api/v1/users/3", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_user_form_validation() {
    let (backend, app) = memory_app();

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/v1/users/validate",
        Some(json!({
            "mode": "create",
            "form": {"name": "", "email": "nope", "role": "ANALYST", "password": "abc"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    assert!(body["errors"]["name"].is_array());
    assert_eq!(body["password"]["label"], "Muy débil");

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({"name": "Pedro", "email": "pedro@", "role": "VIEWER"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["fields"]["email"].is_array());
    assert_eq!(backend.calls("create_user"), 0);
}

#[tokio::test]
async fn test_duplicate_email_surfaces_backend_field_error() {
    let (_, app) = memory_app();
    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({
            "name": "Otra Ana",
            "email": "ana.torres@financiera-ejemplo.mx",
            "role": "ANALYST",
            "password": "Prestamo2024!",
            "password_confirmation": "Prestamo2024!"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["fields"]["email"].is_array());
}

#[tokio::test]
async fn test_api_config_secrets_are_masked() {
    let (backend, app) = memory_app();
    let (status, created) = call_json(
        &app,
        Method::POST,
        "/api/v1/tenants/1/api-configs",
        Some(json!({
            "service_type": "SMS",
            "provider": "twilio",
            "is_active": true,
            "credentials": {"auth_token": "tok_live_9f3a"},
            "settings": {"account_sid": "AC123", "from_number": "+525512345678"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["credentials"]["auth_token"], "••••9f3a");

    let (_, list) = call_json(&app, Method::GET, "/api/v1/tenants/1/api-configs", None).await;
    assert_eq!(list["total"], 1);
    assert_eq!(list["configs"][0]["credentials"]["auth_token"], "••••9f3a");
    assert_eq!(list["configs"][0]["settings"]["account_sid"], "AC123");

    let id = created["id"].as_u64().unwrap();
    let (status, _) = call_json(
        &app,
        Method::PUT,
        &format!("/api/v1/tenants/1/api-configs/{}", id),
        Some(json!({
            "service_type": "SMS",
            "provider": "twilio",
            "is_active": true,
            "credentials": {"auth_token": "••••9f3a"},
            "settings": {"account_sid": "AC789", "from_number": "+525512345678"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let stored = backend.list_api_configs(1).await.unwrap();
    assert_eq!(stored[0].credentials["auth_token"], "tok_live_9f3a");
    assert_eq!(stored[0].settings["account_sid"], "AC789");
}

#[tokio::test]
async fn test_branding_validation() {
    let (backend, app) = memory_app();
    let (status, body) = call_json(
        &app,
        Method::PUT,
        "/api/v1/tenants/1/branding",
        Some(json!({"primary_color": "blue", "logo_url": "https://cdn.example.com/l.png"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["fields"]["primary_color"].is_array());
    assert_eq!(backend.calls("update_branding"), 0);
}

#[tokio::test]
async fn test_provider_catalog() {
    let (_, app) = memory_app();

    let (status, fields) =
        call_json(&app, Method::GET, "/api/v1/providers/EMAIL/smtp/fields", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(fields["fields"]
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f["key"] == "password" && f["kind"] == "secret"));

    let (status, _) = call(&app, Method::GET, "/api/v1/providers/EMAIL/fax/fields", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, result) = call_json(
        &app,
        Method::POST,
        "/api/v1/providers/SMS/twilio/validate",
        Some(json!({"settings": {"account_sid": "AC1"}})),
    )
    .await;
    assert_eq!(result["valid"], false);
    assert!(result["errors"]["credentials.auth_token"].is_array());
}

// ============================================================================
// HTTP backend
// ============================================================================

fn http_backend(server: &MockServer) -> Arc<dyn AdminBackend> {
    assert_ok!(create_backend(&BackendConfig {
        kind: "http".to_string(),
        base_url: server.uri(),
        token: Some("service-token".to_string()),
        tenant_id: Some("3".to_string()),
        timeout_seconds: 5,
    }))
}

#[test]
fn test_unusable_base_url_is_rejected() {
    assert_err!(create_backend(&BackendConfig {
        kind: "http".to_string(),
        base_url: "not a url".to_string(),
        token: None,
        tenant_id: None,
        timeout_seconds: 5,
    })
    .map(|_| ()));
}

#[tokio::test]
async fn test_applications_are_proxied_to_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/applications"))
        .and(header("X-Tenant-ID", "3"))
        .and(header("Authorization", "Bearer service-token"))
        .and(query_param("status", "IN_REVIEW"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "meta": {"current_page": 1, "last_page": 1, "total": 0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_with(http_backend(&server), Settings::default());
    let (status, body) =
        call_json(&app, Method::GET, "/api/v1/applications?status=IN_REVIEW", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 0);
}

#[tokio::test]
async fn test_backend_business_rule_is_translated() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/admin/users/5"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"message": "Cannot delete user with assigned applications"})),
        )
        .mount(&server)
        .await;

    let app = app_with(http_backend(&server), Settings::default());
    let (status, body) = call_json(&app, Method::DELETE, "/api/v1/users/5", None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "BACKEND_REJECTED");
    assert_eq!(
        body["error"]["message"],
        "No se puede eliminar un usuario con solicitudes asignadas."
    );
}

#[tokio::test]
async fn test_masked_credential_is_not_forwarded_as_secret() {
    let server = MockServer::start().await;
    let stored = json!({
        "id": 5,
        "tenant_id": 1,
        "service_type": "SMS",
        "provider": "twilio",
        "is_active": true,
        "credentials": {"auth_token": "tok_live_secret"},
        "settings": {"account_sid": "AC123", "from_number": "+525512345678"}
    });
    Mock::given(method("GET"))
        .and(path("/admin/tenants/1/api-configs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [stored]})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/admin/tenants/1/api-configs/5"))
        .and(body_json(json!({
            "service_type": "SMS",
            "provider": "twilio",
            "is_active": false,
            "is_sandbox": false,
            "credentials": {"auth_token": "tok_live_secret"},
            "settings": {"account_sid": "AC456", "from_number": "+525512345678"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {
            "id": 5,
            "tenant_id": 1,
            "service_type": "SMS",
            "provider": "twilio",
            "is_active": false,
            "credentials": {"auth_token": "tok_live_secret"},
            "settings": {"account_sid": "AC456", "from_number": "+525512345678"}
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_with(http_backend(&server), Settings::default());
    let (status, body) = call_json(
        &app,
        Method::PUT,
        "/api/v1/tenants/1/api-configs/5",
        Some(json!({
            "service_type": "SMS",
            "provider": "twilio",
            "is_active": false,
            "credentials": {"auth_token": "••••cret"},
            "settings": {"account_sid": "AC456", "from_number": "+525512345678"}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["credentials"]["auth_token"], "••••cret");
}

#[tokio::test]
async fn test_update_unknown_api_config_is_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/tenants/1/api-configs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = app_with(http_backend(&server), Settings::default());
    let (status, _) = call(
        &app,
        Method::PUT,
        "/api/v1/tenants/1/api-configs/9",
        Some(json!({"service_type": "SMS", "provider": "twilio"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unreachable_backend_is_bad_gateway() {
    let app = app_with(
        create_backend(&BackendConfig {
            kind: "http".to_string(),
            base_url: "http://127.0.0.1:1".to_string(),
            token: None,
            tenant_id: None,
            timeout_seconds: 2,
        })
        .unwrap(),
        Settings::default(),
    );

    let (status, body) = call_json(&app, Method::POST, "/api/v1/templates/refresh", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "BACKEND_UNREACHABLE");
}
