//! `reqwest` implementation of [`AdminBackend`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use crate::applications::{Application, AssignRequest, RejectRequest};
use crate::config::BackendConfig;
use crate::metrics::BackendMetrics;
use crate::template::{
    CreateTemplateRequest, NotificationTemplate, TemplateConfig, UpdateTemplateRequest,
};
use crate::tenant::{ApiConfig, ApiConfigRequest, Branding, Tenant};
use crate::users::{AdminUser, UserForm};

use super::error::{ClientError, ClientResult};
use super::types::{Envelope, ErrorPayload, ListQuery, Paginated};
use super::AdminBackend;

/// Tenant header expected by the backend.
pub const TENANT_HEADER: &str = "X-Tenant-ID";

/// Per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

const BACKEND_KIND: &str = "http";

/// Lending backend over HTTP.
pub struct HttpAdminBackend {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    tenant_id: Option<String>,
}

impl HttpAdminBackend {
    pub fn new(config: &BackendConfig) -> ClientResult<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| ClientError::Config(format!("Invalid base_url '{}': {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone().filter(|t| !t.is_empty()),
            tenant_id: config.tenant_id.clone().filter(|t| !t.is_empty()),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(tenant_id) = &self.tenant_id {
            builder = builder.header(TENANT_HEADER, tenant_id);
        }
        builder
    }

    /// Send, record metrics and map non-success statuses to [`ClientError`].
    async fn execute(&self, operation: &'static str, builder: RequestBuilder) -> ClientResult<Response> {
        let request_id = Uuid::new_v4();
        let builder = builder.header(REQUEST_ID_HEADER, request_id.to_string());
        let started = Instant::now();

        tracing::debug!(operation, request_id = %request_id, "Sending backend request");

        let result = match builder.send().await {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => Err(error_from_response(response).await),
            Err(e) => Err(ClientError::from(e)),
        };

        let elapsed = started.elapsed().as_secs_f64();
        BackendMetrics::record(BACKEND_KIND, operation, result.is_ok(), elapsed);

        if let Err(e) = &result {
            tracing::warn!(
                operation,
                request_id = %request_id,
                status = ?e.status(),
                error = %e,
                "Backend request failed"
            );
        }

        result
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> ClientResult<T> {
        let response = self.execute(operation, builder).await?;
        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.into_inner())
    }

    async fn send_page<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> ClientResult<Paginated<T>> {
        let response = self.execute(operation, builder).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, operation: &'static str, builder: RequestBuilder) -> ClientResult<()> {
        self.execute(operation, builder).await.map(|_| ())
    }
}

async fn error_from_response(response: Response) -> ClientError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let payload: ErrorPayload = serde_json::from_str(&text).unwrap_or_default();

    let message = payload
        .message
        .filter(|m| !m.trim().is_empty())
        .or_else(|| Some(text.trim().to_string()).filter(|t| !t.is_empty() && !t.starts_with('{')))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation {
            message,
            errors: payload.errors,
        },
        _ => ClientError::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl AdminBackend for HttpAdminBackend {
    fn kind(&self) -> &'static str {
        BACKEND_KIND
    }

    async fn list_templates(&self) -> ClientResult<Vec<NotificationTemplate>> {
        self.send_json(
            "list_templates",
            self.request(Method::GET, "/admin/notification-templates"),
        )
        .await
    }

    async fn template_config(&self) -> ClientResult<TemplateConfig> {
        self.send_json(
            "template_config",
            self.request(Method::GET, "/admin/notification-templates/config"),
        )
        .await
    }

    async fn create_template(
        &self,
        request: &CreateTemplateRequest,
    ) -> ClientResult<NotificationTemplate> {
        self.send_json(
            "create_template",
            self.request(Method::POST, "/admin/notification-templates")
                .json(request),
        )
        .await
    }

    async fn update_template(
        &self,
        id: u64,
        request: &UpdateTemplateRequest,
    ) -> ClientResult<NotificationTemplate> {
        self.send_json(
            "update_template",
            self.request(Method::PUT, &format!("/admin/notification-templates/{}", id))
                .json(request),
        )
        .await
    }

    async fn delete_template(&self, id: u64) -> ClientResult<()> {
        self.send_empty(
            "delete_template",
            self.request(Method::DELETE, &format!("/admin/notification-templates/{}", id)),
        )
        .await
    }

    async fn list_applications(&self, query: &ListQuery) -> ClientResult<Paginated<Application>> {
        self.send_page(
            "list_applications",
            self.request(Method::GET, "/admin/applications")
                .query(&query.pairs()),
        )
        .await
    }

    async fn assign_application(&self, id: u64, assignee_id: u64) -> ClientResult<Application> {
        self.send_json(
            "assign_application",
            self.request(Method::POST, &format!("/admin/applications/{}/assign", id))
                .json(&AssignRequest {
                    assigned_to: assignee_id,
                }),
        )
        .await
    }

    async fn reject_application(&self, id: u64, reason: &str) -> ClientResult<Application> {
        self.send_json(
            "reject_application",
            self.request(Method::POST, &format!("/admin/applications/{}/reject", id))
                .json(&RejectRequest {
                    reason: reason.to_string(),
                }),
        )
        .await
    }

    async fn list_users(&self, query: &ListQuery) -> ClientResult<Paginated<AdminUser>> {
        self.send_page(
            "list_users",
            self.request(Method::GET, "/admin/users").query(&query.pairs()),
        )
        .await
    }

    async fn create_user(&self, form: &UserForm) -> ClientResult<AdminUser> {
        self.send_json(
            "create_user",
            self.request(Method::POST, "/admin/users").json(form),
        )
        .await
    }

    async fn update_user(&self, id: u64, form: &UserForm) -> ClientResult<AdminUser> {
        self.send_json(
            "update_user",
            self.request(Method::PUT, &format!("/admin/users/{}", id))
                .json(form),
        )
        .await
    }

    async fn delete_user(&self, id: u64) -> ClientResult<()> {
        self.send_empty(
            "delete_user",
            self.request(Method::DELETE, &format!("/admin/users/{}", id)),
        )
        .await
    }

    async fn toggle_user_active(&self, id: u64) -> ClientResult<AdminUser> {
        self.send_json(
            "toggle_user_active",
            self.request(Method::PATCH, &format!("/admin/users/{}/toggle-active", id)),
        )
        .await
    }

    async fn platform_config(&self) -> ClientResult<serde_json::Value> {
        self.send_json("platform_config", self.request(Method::GET, "/admin/config"))
            .await
    }

    async fn list_tenants(&self) -> ClientResult<Vec<Tenant>> {
        self.send_json("list_tenants", self.request(Method::GET, "/admin/tenants"))
            .await
    }

    async fn update_branding(&self, tenant_id: u64, branding: &Branding) -> ClientResult<Tenant> {
        self.send_json(
            "update_branding",
            self.request(Method::PUT, &format!("/admin/tenants/{}", tenant_id))
                .json(&json!({ "branding": branding })),
        )
        .await
    }

    async fn list_api_configs(&self, tenant_id: u64) -> ClientResult<Vec<ApiConfig>> {
        self.send_json(
            "list_api_configs",
            self.request(
                Method::GET,
                &format!("/admin/tenants/{}/api-configs", tenant_id),
            ),
        )
        .await
    }

    async fn save_api_config(
        &self,
        tenant_id: u64,
        config_id: Option<u64>,
        request: &ApiConfigRequest,
    ) -> ClientResult<ApiConfig> {
        let builder = match config_id {
            Some(config_id) => self.request(
                Method::PUT,
                &format!("/admin/tenants/{}/api-configs/{}", tenant_id, config_id),
            ),
            None => self.request(
                Method::POST,
                &format!("/admin/tenants/{}/api-configs", tenant_id),
            ),
        };
        self.send_json("save_api_config", builder.json(request)).await
    }

    async fn delete_api_config(&self, tenant_id: u64, config_id: u64) -> ClientResult<()> {
        self.send_empty(
            "delete_api_config",
            self.request(
                Method::DELETE,
                &format!("/admin/tenants/{}/api-configs/{}", tenant_id, config_id),
            ),
        )
        .await
    }
}
