//! In-memory [`AdminBackend`] using DashMap.
//!
//! Mirrors the backend's observable behaviour closely enough for local runs
//! and tests: list filtering and pagination, 422 payloads for duplicate
//! emails, the assigned-applications delete rule. Faults and delays can be
//! injected per operation, per resource id or per call number, and every call
//! is counted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::applications::{Applicant, Application, ApplicationFilters, ApplicationStatus, StaffRef};
use crate::listing::paginate;
use crate::metrics::BackendMetrics;
use crate::template::catalog::default_config;
use crate::template::{
    CreateTemplateRequest, NotificationTemplate, TemplateConfig, UpdateTemplateRequest,
};
use crate::tenant::{ApiConfig, ApiConfigRequest, Branding, Tenant};
use crate::users::{AdminUser, UserForm, UserRole};

use super::error::{ClientError, ClientResult};
use super::types::{ListQuery, Paginated};
use super::AdminBackend;

const BACKEND_KIND: &str = "memory";

/// An injected failure.
#[derive(Debug, Clone)]
pub enum Fault {
    /// Behaves like an unreachable backend
    Transport,
    NotFound,
    Rejected { status: u16, message: String },
    Validation { field: String, message: String },
}

impl Fault {
    pub fn rejected(status: u16, message: &str) -> Self {
        Fault::Rejected {
            status,
            message: message.to_string(),
        }
    }

    fn to_error(&self, operation: &str) -> ClientError {
        match self {
            Fault::Transport => {
                ClientError::Transport(format!("injected transport failure in {}", operation))
            }
            Fault::NotFound => ClientError::NotFound(format!("injected not found in {}", operation)),
            Fault::Rejected { status, message } => ClientError::Rejected {
                status: *status,
                message: message.clone(),
            },
            Fault::Validation { field, message } => {
                validation_error(field, message)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FaultTarget {
    Always,
    Id(u64),
    /// 1-based call number of the operation
    Call(usize),
}

#[derive(Debug, Clone)]
struct FaultRule {
    target: FaultTarget,
    fault: Fault,
}

fn validation_error(field: &str, message: &str) -> ClientError {
    ClientError::Validation {
        message: "The given data was invalid.".to_string(),
        errors: [(field.to_string(), vec![message.to_string()])]
            .into_iter()
            .collect(),
    }
}

fn not_found(kind: &str, id: u64) -> ClientError {
    ClientError::NotFound(format!("{} {} not found", kind, id))
}

/// In-process lending backend.
pub struct MemoryBackend {
    templates: DashMap<u64, NotificationTemplate>,
    config: RwLock<TemplateConfig>,
    applications: DashMap<u64, Application>,
    users: DashMap<u64, AdminUser>,
    tenants: DashMap<u64, Tenant>,
    api_configs: DashMap<u64, ApiConfig>,
    platform: RwLock<serde_json::Value>,
    next_id: AtomicU64,
    calls: DashMap<String, usize>,
    faults: DashMap<String, Vec<FaultRule>>,
    delays: DashMap<(String, usize), Duration>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Empty backend serving the built-in template config.
    pub fn new() -> Self {
        Self {
            templates: DashMap::new(),
            config: RwLock::new(default_config()),
            applications: DashMap::new(),
            users: DashMap::new(),
            tenants: DashMap::new(),
            api_configs: DashMap::new(),
            platform: RwLock::new(serde_json::json!({})),
            next_id: AtomicU64::new(1),
            calls: DashMap::new(),
            faults: DashMap::new(),
            delays: DashMap::new(),
        }
    }

    /// Backend preloaded with one tenant, a few staff users and applications.
    pub fn with_demo_data() -> Self {
        let backend = Self::new();

        backend.seed_tenant(Tenant {
            id: 1,
            name: "Financiera Ejemplo".to_string(),
            slug: "financiera-ejemplo".to_string(),
            is_active: true,
            branding: Branding {
                primary_color: Some("#1D4ED8".to_string()),
                secondary_color: Some("#F59E0B".to_string()),
                logo_url: Some("https://cdn.financiera-ejemplo.mx/logo.png".to_string()),
                support_email: Some("soporte@financiera-ejemplo.mx".to_string()),
                support_phone: Some("55 1234 5678".to_string()),
            },
        });

        let staff = [
            (1, "Ana Torres", "ana.torres@financiera-ejemplo.mx", UserRole::Admin),
            (2, "Carlos Ramírez", "carlos.ramirez@financiera-ejemplo.mx", UserRole::Analyst),
            (3, "Lucía Méndez", "lucia.mendez@financiera-ejemplo.mx", UserRole::Viewer),
        ];
        for (id, name, email, role) in staff {
            backend.seed_user(AdminUser {
                id,
                name: name.to_string(),
                email: email.to_string(),
                phone: None,
                role,
                is_active: true,
                assigned_applications_count: 0,
                created_at: Some(Utc::now()),
            });
        }

        let applicants = [
            ("María", "González", ApplicationStatus::Submitted, None),
            ("Luis", "Pérez", ApplicationStatus::Submitted, Some(2)),
            ("Sofía", "Hernández", ApplicationStatus::InReview, Some(2)),
            ("Jorge", "López", ApplicationStatus::DocsPending, None),
            ("Elena", "Martínez", ApplicationStatus::Approved, Some(1)),
            ("Diego", "Sánchez", ApplicationStatus::Draft, None),
        ];
        for (i, (first, last, status, assignee)) in applicants.into_iter().enumerate() {
            let id = i as u64 + 1;
            let assigned_to = assignee.and_then(|staff_id| {
                backend.users.get_mut(&staff_id).map(|mut user| {
                    user.assigned_applications_count += 1;
                    StaffRef {
                        id: staff_id,
                        name: user.name.clone(),
                    }
                })
            });
            backend.seed_application(Application {
                id,
                folio: format!("SOL-2024-{:06}", id),
                applicant: Applicant {
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    email: format!("{}.{}@example.com", first, last)
                        .to_lowercase(),
                    phone: None,
                },
                product_name: "Crédito Personal".to_string(),
                requested_amount: 10_000.0 * id as f64,
                term_months: 12,
                status,
                assigned_to,
                created_at: Utc::now() - ChronoDuration::days(id as i64),
                updated_at: None,
            });
        }

        backend
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn bump_next_id(&self, id: u64) {
        self.next_id.fetch_max(id + 1, Ordering::SeqCst);
    }

    // ------------------------------------------------------------------
    // Seeding
    // ------------------------------------------------------------------

    pub fn seed_template(&self, request: CreateTemplateRequest) -> NotificationTemplate {
        let template = template_from(self.next_id(), request);
        self.templates.insert(template.id, template.clone());
        template
    }

    pub fn seed_application(&self, application: Application) {
        self.bump_next_id(application.id);
        self.applications.insert(application.id, application);
    }

    pub fn seed_user(&self, user: AdminUser) {
        self.bump_next_id(user.id);
        self.users.insert(user.id, user);
    }

    pub fn seed_tenant(&self, tenant: Tenant) {
        self.bump_next_id(tenant.id);
        self.tenants.insert(tenant.id, tenant);
    }

    pub async fn set_template_config(&self, config: TemplateConfig) {
        *self.config.write().await = config;
    }

    pub async fn set_platform_config(&self, value: serde_json::Value) {
        *self.platform.write().await = value;
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    pub fn application(&self, id: u64) -> Option<Application> {
        self.applications.get(&id).map(|a| a.clone())
    }

    /// Number of times `operation` was called, failed calls included.
    pub fn calls(&self, operation: &str) -> usize {
        self.calls.get(operation).map(|c| *c).unwrap_or(0)
    }

    // ------------------------------------------------------------------
    // Fault injection
    // ------------------------------------------------------------------

    fn add_fault(&self, operation: &str, target: FaultTarget, fault: Fault) {
        self.faults
            .entry(operation.to_string())
            .or_default()
            .push(FaultRule { target, fault });
    }

    /// Every call of `operation` fails.
    pub fn fail(&self, operation: &str, fault: Fault) {
        self.add_fault(operation, FaultTarget::Always, fault);
    }

    /// Calls of `operation` on resource `id` fail.
    pub fn fail_for(&self, operation: &str, id: u64, fault: Fault) {
        self.add_fault(operation, FaultTarget::Id(id), fault);
    }

    /// The `call`-th (1-based) call of `operation` fails.
    pub fn fail_on_call(&self, operation: &str, call: usize, fault: Fault) {
        self.add_fault(operation, FaultTarget::Call(call), fault);
    }

    /// The `call`-th (1-based) call of `operation` takes `delay` before answering.
    pub fn delay_call(&self, operation: &str, call: usize, delay: Duration) {
        self.delays.insert((operation.to_string(), call), delay);
    }

    pub fn clear_faults(&self) {
        self.faults.clear();
        self.delays.clear();
    }

    /// Count the call, apply delays and injected faults.
    async fn enter(&self, operation: &'static str, id: Option<u64>) -> ClientResult<()> {
        let call = {
            let mut count = self.calls.entry(operation.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        let delay = self
            .delays
            .get(&(operation.to_string(), call))
            .map(|d| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let fault = self.faults.get(operation).and_then(|rules| {
            rules
                .iter()
                .find(|rule| match rule.target {
                    FaultTarget::Always => true,
                    FaultTarget::Id(target) => id == Some(target),
                    FaultTarget::Call(target) => call == target,
                })
                .map(|rule| rule.fault.clone())
        });

        match fault {
            Some(fault) => {
                BackendMetrics::record(BACKEND_KIND, operation, false, 0.0);
                tracing::debug!(operation, call, ?id, "Injected backend fault");
                Err(fault.to_error(operation))
            }
            None => {
                BackendMetrics::record(BACKEND_KIND, operation, true, 0.0);
                Ok(())
            }
        }
    }
}

fn template_from(id: u64, request: CreateTemplateRequest) -> NotificationTemplate {
    NotificationTemplate {
        id,
        name: request.name,
        event: request.event,
        channel: request.channel,
        is_active: request.is_active,
        priority: request.priority,
        subject: request.subject,
        body: request.body,
        html_body: request.html_body,
        created_by: Some("console".to_string()),
        updated_at: Some(Utc::now()),
    }
}

fn sorted_by_id<T: Clone>(map: &DashMap<u64, T>) -> Vec<T> {
    let mut entries: Vec<(u64, T)> = map.iter().map(|e| (*e.key(), e.value().clone())).collect();
    entries.sort_by_key(|(id, _)| *id);
    entries.into_iter().map(|(_, v)| v).collect()
}

#[async_trait]
impl AdminBackend for MemoryBackend {
    fn kind(&self) -> &'static str {
        BACKEND_KIND
    }

    async fn list_templates(&self) -> ClientResult<Vec<NotificationTemplate>> {
        self.enter("list_templates", None).await?;
        Ok(sorted_by_id(&self.templates))
    }

    async fn template_config(&self) -> ClientResult<TemplateConfig> {
        self.enter("template_config", None).await?;
        Ok(self.config.read().await.clone())
    }

    async fn create_template(
        &self,
        request: &CreateTemplateRequest,
    ) -> ClientResult<NotificationTemplate> {
        self.enter("create_template", None).await?;
        request
            .validate()
            .map_err(|e| validation_error("template", &e.to_string()))?;

        let template = template_from(self.next_id(), request.clone());
        self.templates.insert(template.id, template.clone());
        Ok(template)
    }

    async fn update_template(
        &self,
        id: u64,
        request: &UpdateTemplateRequest,
    ) -> ClientResult<NotificationTemplate> {
        self.enter("update_template", Some(id)).await?;
        request
            .validate()
            .map_err(|e| validation_error("template", &e.to_string()))?;

        let mut template = self
            .templates
            .get_mut(&id)
            .ok_or_else(|| not_found("Template", id))?;
        request.apply_to(&mut template);
        Ok(template.clone())
    }

    async fn delete_template(&self, id: u64) -> ClientResult<()> {
        self.enter("delete_template", Some(id)).await?;
        self.templates
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("Template", id))
    }

    async fn list_applications(&self, query: &ListQuery) -> ClientResult<Paginated<Application>> {
        self.enter("list_applications", None).await?;
        let filters = ApplicationFilters::from_query(query);
        let matching = filters.apply(&sorted_by_id(&self.applications));
        Ok(paginate(&matching, query.page, query.per_page))
    }

    async fn assign_application(&self, id: u64, assignee_id: u64) -> ClientResult<Application> {
        self.enter("assign_application", Some(id)).await?;

        let assignee = self
            .users
            .get(&assignee_id)
            .map(|u| u.clone())
            .ok_or_else(|| validation_error("assigned_to", "The selected assigned to is invalid."))?;
        if !assignee.is_active {
            return Err(ClientError::Rejected {
                status: 409,
                message: "Assignee is not active".to_string(),
            });
        }

        let (previous, updated) = {
            let mut application = self
                .applications
                .get_mut(&id)
                .ok_or_else(|| not_found("Application", id))?;
            let previous = application.assigned_to.replace(StaffRef {
                id: assignee.id,
                name: assignee.name.clone(),
            });
            application.updated_at = Some(Utc::now());
            (previous, application.clone())
        };

        if let Some(previous) = previous {
            if let Some(mut user) = self.users.get_mut(&previous.id) {
                user.assigned_applications_count = user.assigned_applications_count.saturating_sub(1);
            }
        }
        if let Some(mut user) = self.users.get_mut(&assignee.id) {
            user.assigned_applications_count += 1;
        }

        Ok(updated)
    }

    async fn reject_application(&self, id: u64, reason: &str) -> ClientResult<Application> {
        self.enter("reject_application", Some(id)).await?;
        if reason.trim().is_empty() {
            return Err(validation_error("reason", "The reason field is required."));
        }

        let mut application = self
            .applications
            .get_mut(&id)
            .ok_or_else(|| not_found("Application", id))?;
        if application.status.is_final() {
            return Err(ClientError::Rejected {
                status: 409,
                message: "Application cannot be rejected in its current status".to_string(),
            });
        }
        application.status = ApplicationStatus::Rejected;
        application.updated_at = Some(Utc::now());
        Ok(application.clone())
    }

    async fn list_users(&self, query: &ListQuery) -> ClientResult<Paginated<AdminUser>> {
        self.enter("list_users", None).await?;
        let search = query.get("search").map(str::to_lowercase);
        let role = query.get("role");

        let matching: Vec<AdminUser> = sorted_by_id(&self.users)
            .into_iter()
            .filter(|u| {
                search.as_ref().map_or(true, |s| {
                    u.name.to_lowercase().contains(s) || u.email.to_lowercase().contains(s)
                })
            })
            .filter(|u| {
                role.map_or(true, |r| u.role.as_str().eq_ignore_ascii_case(r))
            })
            .collect();

        Ok(paginate(&matching, query.page, query.per_page))
    }

    async fn create_user(&self, form: &UserForm) -> ClientResult<AdminUser> {
        self.enter("create_user", None).await?;
        let email = form.email.trim().to_lowercase();
        if self.users.iter().any(|u| u.email.to_lowercase() == email) {
            return Err(validation_error("email", "The email has already been taken."));
        }

        let user = AdminUser {
            id: self.next_id(),
            name: form.name.trim().to_string(),
            email,
            phone: form.phone.clone(),
            role: form.role,
            is_active: form.is_active,
            assigned_applications_count: 0,
            created_at: Some(Utc::now()),
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: u64, form: &UserForm) -> ClientResult<AdminUser> {
        self.enter("update_user", Some(id)).await?;
        let email = form.email.trim().to_lowercase();
        if self
            .users
            .iter()
            .any(|u| u.id != id && u.email.to_lowercase() == email)
        {
            return Err(validation_error("email", "The email has already been taken."));
        }

        let mut user = self.users.get_mut(&id).ok_or_else(|| not_found("User", id))?;
        user.name = form.name.trim().to_string();
        user.email = email;
        user.phone = form.phone.clone();
        user.role = form.role;
        user.is_active = form.is_active;
        Ok(user.clone())
    }

    async fn delete_user(&self, id: u64) -> ClientResult<()> {
        self.enter("delete_user", Some(id)).await?;
        let assigned = self
            .users
            .get(&id)
            .map(|u| u.assigned_applications_count)
            .ok_or_else(|| not_found("User", id))?;
        if assigned > 0 {
            return Err(ClientError::Rejected {
                status: 409,
                message: "Cannot delete user with assigned applications".to_string(),
            });
        }
        self.users.remove(&id);
        Ok(())
    }

    async fn toggle_user_active(&self, id: u64) -> ClientResult<AdminUser> {
        self.enter("toggle_user_active", Some(id)).await?;
        let mut user = self.users.get_mut(&id).ok_or_else(|| not_found("User", id))?;
        user.is_active = !user.is_active;
        Ok(user.clone())
    }

    async fn platform_config(&self) -> ClientResult<serde_json::Value> {
        self.enter("platform_config", None).await?;
        Ok(self.platform.read().await.clone())
    }

    async fn list_tenants(&self) -> ClientResult<Vec<Tenant>> {
        self.enter("list_tenants", None).await?;
        Ok(sorted_by_id(&self.tenants))
    }

    async fn update_branding(&self, tenant_id: u64, branding: &Branding) -> ClientResult<Tenant> {
        self.enter("update_branding", Some(tenant_id)).await?;
        let mut tenant = self
            .tenants
            .get_mut(&tenant_id)
            .ok_or_else(|| not_found("Tenant", tenant_id))?;
        tenant.branding = branding.clone();
        Ok(tenant.clone())
    }

    async fn list_api_configs(&self, tenant_id: u64) -> ClientResult<Vec<ApiConfig>> {
        self.enter("list_api_configs", Some(tenant_id)).await?;
        Ok(sorted_by_id(&self.api_configs)
            .into_iter()
            .filter(|c| c.tenant_id == tenant_id)
            .collect())
    }

    async fn save_api_config(
        &self,
        tenant_id: u64,
        config_id: Option<u64>,
        request: &ApiConfigRequest,
    ) -> ClientResult<ApiConfig> {
        self.enter("save_api_config", config_id).await?;
        if !self.tenants.contains_key(&tenant_id) {
            return Err(not_found("Tenant", tenant_id));
        }

        let id = match config_id {
            Some(id) => {
                if !self.api_configs.get(&id).is_some_and(|c| c.tenant_id == tenant_id) {
                    return Err(not_found("API config", id));
                }
                id
            }
            None => self.next_id(),
        };

        let config = request.clone().into_config(id, tenant_id);
        self.api_configs.insert(id, config.clone());
        Ok(config)
    }

    async fn delete_api_config(&self, tenant_id: u64, config_id: u64) -> ClientResult<()> {
        self.enter("delete_api_config", Some(config_id)).await?;
        match self.api_configs.get(&config_id).map(|c| c.tenant_id) {
            Some(owner) if owner == tenant_id => {
                self.api_configs.remove(&config_id);
                Ok(())
            }
            _ => Err(not_found("API config", config_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Channel;
    use crate::tenant::ServiceType;

    fn request(name: &str) -> CreateTemplateRequest {
        CreateTemplateRequest {
            name: name.to_string(),
            event: "otp_verification".to_string(),
            channel: Channel::Sms,
            is_active: true,
            priority: 5,
            subject: None,
            body: "{{otp.code}}".to_string(),
            html_body: None,
        }
    }

    #[tokio::test]
    async fn test_template_crud() {
        let backend = MemoryBackend::new();
        let created = backend.create_template(&request("a")).await.unwrap();
        assert_eq!(created.created_by.as_deref(), Some("console"));

        let updated = backend
            .update_template(created.id, &UpdateTemplateRequest::toggle(false))
            .await
            .unwrap();
        assert!(!updated.is_active);

        backend.delete_template(created.id).await.unwrap();
        assert!(matches!(
            backend.delete_template(created.id).await,
            Err(ClientError::NotFound(_))
        ));
        assert_eq!(backend.calls("delete_template"), 2);
    }

    #[tokio::test]
    async fn test_fault_targets() {
        let backend = MemoryBackend::new();
        backend.fail_on_call("create_template", 2, Fault::Transport);

        assert!(backend.create_template(&request("1")).await.is_ok());
        assert!(matches!(
            backend.create_template(&request("2")).await,
            Err(ClientError::Transport(_))
        ));
        assert!(backend.create_template(&request("3")).await.is_ok());

        let t = backend.seed_template(request("x"));
        backend.fail_for("delete_template", t.id, Fault::rejected(409, "locked"));
        assert!(backend.delete_template(t.id).await.is_err());

        backend.clear_faults();
        assert!(backend.delete_template(t.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_demo_data_and_filtered_listing() {
        let backend = MemoryBackend::with_demo_data();
        let query = ListQuery::new(1, 20)
            .filter("status", "SUBMITTED")
            .filter("assignment", "unassigned");

        let page = backend.list_applications(&query).await.unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].applicant.first_name, "María");

        let all = backend.list_applications(&ListQuery::new(1, 4)).await.unwrap();
        assert_eq!(all.meta.last_page, 2);
        assert_eq!(all.meta.total, 6);
    }

    #[tokio::test]
    async fn test_delete_user_with_assignments_is_rejected() {
        let backend = MemoryBackend::with_demo_data();
        let err = backend.delete_user(2).await.unwrap_err();
        assert!(matches!(err, ClientError::Rejected { status: 409, .. }));

        // Viewer has nothing assigned
        backend.delete_user(3).await.unwrap();
    }

    #[tokio::test]
    async fn test_assign_moves_assignment_counts() {
        let backend = MemoryBackend::with_demo_data();
        backend.assign_application(2, 1).await.unwrap();

        let users = backend.list_users(&ListQuery::default()).await.unwrap().data;
        let count = |id: u64| {
            users
                .iter()
                .find(|u| u.id == id)
                .map(|u| u.assigned_applications_count)
                .unwrap()
        };
        assert_eq!(count(1), 2);
        assert_eq!(count(2), 1);
    }

    #[tokio::test]
    async fn test_reject_final_status() {
        let backend = MemoryBackend::with_demo_data();
        assert_eq!(
            backend.reject_application(1, "Ingresos insuficientes").await.unwrap().status,
            ApplicationStatus::Rejected
        );
        assert!(backend.reject_application(5, "x").await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_validation_error() {
        let backend = MemoryBackend::with_demo_data();
        let form = UserForm {
            name: "Otra Ana".to_string(),
            email: "ANA.TORRES@financiera-ejemplo.mx".to_string(),
            phone: None,
            role: UserRole::Analyst,
            is_active: true,
            password: None,
            password_confirmation: None,
        };
        let err = backend.create_user(&form).await.unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("email"));
    }

    #[tokio::test]
    async fn test_api_config_update_replaces_stored_values() {
        let backend = MemoryBackend::with_demo_data();
        let mut request = ApiConfigRequest {
            service_type: ServiceType::Sms,
            provider: "twilio".to_string(),
            is_active: true,
            is_sandbox: true,
            credentials: [("auth_token".to_string(), "real-secret".to_string())]
                .into_iter()
                .collect(),
            settings: Default::default(),
        };
        let saved = backend.save_api_config(1, None, &request).await.unwrap();

        request
            .credentials
            .insert("auth_token".to_string(), "rotated-secret".to_string());
        let updated = backend
            .save_api_config(1, Some(saved.id), &request)
            .await
            .unwrap();
        assert_eq!(updated.credentials["auth_token"], "rotated-secret");
        assert_eq!(backend.list_api_configs(1).await.unwrap().len(), 1);

        let err = backend.save_api_config(2, Some(saved.id), &request).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }
}
