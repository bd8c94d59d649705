//! Typed client for the lending platform's admin REST API.
//!
//! Every view and operation in the console goes through [`AdminBackend`]. Two
//! implementations exist:
//! - [`HttpAdminBackend`]: `reqwest` client against the real backend
//! - [`MemoryBackend`]: in-process fake with fault injection, used when no
//!   backend is reachable and by tests
//!
//! Use [`create_backend`] to pick one from configuration.

mod error;
mod factory;
mod http;
mod memory;
mod types;

use async_trait::async_trait;

pub use error::{ClientError, ClientResult};
pub use factory::create_backend;
pub use http::HttpAdminBackend;
pub use memory::{Fault, MemoryBackend};
pub use types::{ListQuery, PageMeta, Paginated};

use crate::applications::Application;
use crate::template::{CreateTemplateRequest, NotificationTemplate, TemplateConfig, UpdateTemplateRequest};
use crate::tenant::{ApiConfig, ApiConfigRequest, Branding, Tenant};
use crate::users::{AdminUser, UserForm};

/// Operations the console performs against the lending backend.
///
/// Implementations must be thread-safe (`Send + Sync`); a single instance is
/// shared by every handler and view.
#[async_trait]
pub trait AdminBackend: Send + Sync {
    /// Backend type identifier for logs and health output.
    fn kind(&self) -> &'static str;

    // Notification templates

    async fn list_templates(&self) -> ClientResult<Vec<NotificationTemplate>>;

    async fn template_config(&self) -> ClientResult<TemplateConfig>;

    async fn create_template(
        &self,
        request: &CreateTemplateRequest,
    ) -> ClientResult<NotificationTemplate>;

    async fn update_template(
        &self,
        id: u64,
        request: &UpdateTemplateRequest,
    ) -> ClientResult<NotificationTemplate>;

    async fn delete_template(&self, id: u64) -> ClientResult<()>;

    // Applications

    async fn list_applications(&self, query: &ListQuery) -> ClientResult<Paginated<Application>>;

    async fn assign_application(&self, id: u64, assignee_id: u64) -> ClientResult<Application>;

    async fn reject_application(&self, id: u64, reason: &str) -> ClientResult<Application>;

    // Users

    async fn list_users(&self, query: &ListQuery) -> ClientResult<Paginated<AdminUser>>;

    async fn create_user(&self, form: &UserForm) -> ClientResult<AdminUser>;

    async fn update_user(&self, id: u64, form: &UserForm) -> ClientResult<AdminUser>;

    /// Rejected by the backend while the user has assigned applications.
    async fn delete_user(&self, id: u64) -> ClientResult<()>;

    async fn toggle_user_active(&self, id: u64) -> ClientResult<AdminUser>;

    // Tenants and settings

    /// Platform-wide settings document (`/admin/config`).
    async fn platform_config(&self) -> ClientResult<serde_json::Value>;

    async fn list_tenants(&self) -> ClientResult<Vec<Tenant>>;

    async fn update_branding(&self, tenant_id: u64, branding: &Branding) -> ClientResult<Tenant>;

    async fn list_api_configs(&self, tenant_id: u64) -> ClientResult<Vec<ApiConfig>>;

    /// Create when `config_id` is `None`, update otherwise.
    async fn save_api_config(
        &self,
        tenant_id: u64,
        config_id: Option<u64>,
        request: &ApiConfigRequest,
    ) -> ClientResult<ApiConfig>;

    async fn delete_api_config(&self, tenant_id: u64, config_id: u64) -> ClientResult<()>;
}
