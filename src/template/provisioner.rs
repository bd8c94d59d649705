//! Suggested-template provisioning.
//!
//! Requests are strictly sequential: every existing template is deleted one by
//! one (unless keeping), then every catalog entry is created one by one. The
//! first failure ends the run. Nothing is rolled back or retried.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::{AdminBackend, ClientError};
use crate::metrics::ProvisionMetrics;

use super::catalog::suggested_templates;
use super::types::CreateTemplateRequest;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvisionMode {
    /// Delete every existing template, then create the catalog
    #[default]
    Replace,
    /// Delete every existing template and create nothing
    Delete,
    /// Create the catalog next to the existing templates
    Keep,
}

impl ProvisionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProvisionMode::Replace => "replace",
            ProvisionMode::Delete => "delete",
            ProvisionMode::Keep => "keep",
        }
    }

    fn deletes(&self) -> bool {
        !matches!(self, ProvisionMode::Keep)
    }

    fn creates(&self) -> bool {
        !matches!(self, ProvisionMode::Delete)
    }
}

impl std::str::FromStr for ProvisionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(ProvisionMode::Replace),
            "delete" => Ok(ProvisionMode::Delete),
            "keep" => Ok(ProvisionMode::Keep),
            other => Err(format!("Unknown provision mode: {}", other)),
        }
    }
}

/// What a provisioning run did before it finished or stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub mode: ProvisionMode,
    pub deleted: usize,
    pub created: usize,
    /// Catalog size the run aimed for (0 in delete mode)
    pub planned: usize,
    /// Backend error that stopped the run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Spanish display text for `error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProvisionReport {
    fn new(mode: ProvisionMode, planned: usize) -> Self {
        Self {
            mode,
            deleted: 0,
            created: 0,
            planned,
            error: None,
            message: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    fn fail(mut self, stage: &str, err: ClientError) -> Self {
        tracing::error!(
            mode = self.mode.as_str(),
            stage,
            deleted = self.deleted,
            created = self.created,
            error = %err,
            "Template provisioning stopped"
        );
        self.message = Some(err.user_message());
        self.error = Some(err.to_string());
        ProvisionMetrics::record_run(self.mode.as_str(), false);
        self
    }
}

/// Bulk-creates the suggested catalog against the backend.
pub struct TemplateProvisioner {
    backend: Arc<dyn AdminBackend>,
    catalog: Vec<CreateTemplateRequest>,
}

impl TemplateProvisioner {
    pub fn new(backend: Arc<dyn AdminBackend>) -> Self {
        Self::with_catalog(backend, suggested_templates())
    }

    pub fn with_catalog(backend: Arc<dyn AdminBackend>, catalog: Vec<CreateTemplateRequest>) -> Self {
        Self { backend, catalog }
    }

    pub fn catalog(&self) -> &[CreateTemplateRequest] {
        &self.catalog
    }

    /// Run one provisioning pass. Never returns early with an error: the
    /// report carries the counts reached and the error that stopped the run.
    pub async fn provision(&self, mode: ProvisionMode) -> ProvisionReport {
        let planned = if mode.creates() { self.catalog.len() } else { 0 };
        let mut report = ProvisionReport::new(mode, planned);

        tracing::info!(mode = mode.as_str(), planned, "Starting template provisioning");

        if mode.deletes() {
            let existing = match self.backend.list_templates().await {
                Ok(templates) => templates,
                Err(e) => return report.fail("list", e),
            };

            for template in existing {
                if let Err(e) = self.backend.delete_template(template.id).await {
                    return report.fail("delete", e);
                }
                report.deleted += 1;
                ProvisionMetrics::record_deleted();
            }
        }

        if mode.creates() {
            for request in &self.catalog {
                if let Err(e) = self.backend.create_template(request).await {
                    return report.fail("create", e);
                }
                report.created += 1;
                ProvisionMetrics::record_created();
            }
        }

        ProvisionMetrics::record_run(mode.as_str(), true);
        tracing::info!(
            mode = mode.as_str(),
            deleted = report.deleted,
            created = report.created,
            "Template provisioning completed"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Fault, MemoryBackend};
    use crate::template::Channel;

    fn entry(name: &str) -> CreateTemplateRequest {
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

    fn backend_with(existing: usize) -> Arc<MemoryBackend> {
        let backend = Arc::new(MemoryBackend::new());
        for i in 0..existing {
            backend.seed_template(entry(&format!("old-{}", i)));
        }
        backend
    }

    fn provisioner(backend: &Arc<MemoryBackend>, size: usize) -> TemplateProvisioner {
        let catalog = (0..size).map(|i| entry(&format!("new-{}", i))).collect();
        TemplateProvisioner::with_catalog(backend.clone(), catalog)
    }

    #[tokio::test]
    async fn test_replace_deletes_then_creates() {
        let backend = backend_with(2);
        let report = provisioner(&backend, 3).provision(ProvisionMode::Replace).await;

        assert!(report.is_complete());
        assert_eq!((report.deleted, report.created), (2, 3));
        assert_eq!(backend.calls("delete_template"), 2);
        assert_eq!(backend.calls("create_template"), 3);
        assert_eq!(backend.template_count(), 3);
    }

    #[tokio::test]
    async fn test_delete_mode_creates_nothing() {
        let backend = backend_with(2);
        let report = provisioner(&backend, 3).provision(ProvisionMode::Delete).await;

        assert_eq!((report.deleted, report.created, report.planned), (2, 0, 0));
        assert_eq!(backend.calls("create_template"), 0);
        assert_eq!(backend.template_count(), 0);
    }

    #[tokio::test]
    async fn test_keep_allows_duplicates() {
        let backend = backend_with(0);
        let p = provisioner(&backend, 2);
        p.provision(ProvisionMode::Keep).await;
        let report = p.provision(ProvisionMode::Keep).await;

        assert_eq!(report.deleted, 0);
        assert_eq!(backend.calls("list_templates"), 0);
        assert_eq!(backend.template_count(), 4);
    }

    #[tokio::test]
    async fn test_failure_stops_without_rollback_or_retry() {
        let backend = backend_with(1);
        backend.fail_on_call("create_template", 3, Fault::rejected(500, "Server Error"));

        let report = provisioner(&backend, 5).provision(ProvisionMode::Replace).await;

        assert!(!report.is_complete());
        assert_eq!((report.deleted, report.created), (1, 2));
        assert_eq!(backend.calls("create_template"), 3);
        assert_eq!(backend.template_count(), 2);
        assert!(report.error.as_deref().unwrap().contains("Server Error"));
        assert_eq!(
            report.message.as_deref(),
            Some(crate::error::messages::SERVER_ERROR)
        );
    }

    #[tokio::test]
    async fn test_delete_failure_stops_before_creating() {
        let backend = backend_with(3);
        backend.fail_on_call("delete_template", 2, Fault::Transport);

        let report = provisioner(&backend, 2).provision(ProvisionMode::Replace).await;
        assert_eq!((report.deleted, report.created), (1, 0));
        assert_eq!(backend.calls("create_template"), 0);
    }

    #[tokio::test]
    async fn test_default_catalog() {
        let backend = backend_with(0);
        let p = TemplateProvisioner::new(backend.clone());
        let report = p.provision(ProvisionMode::Replace).await;
        assert_eq!(report.created, p.catalog().len());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("KEEP".parse::<ProvisionMode>().unwrap(), ProvisionMode::Keep);
        assert!("merge".parse::<ProvisionMode>().is_err());
        let mode: ProvisionMode = serde_json::from_str("\"delete\"").unwrap();
        assert_eq!(mode, ProvisionMode::Delete);
    }
}
