//! Local cache of notification templates and their config.
//!
//! The backend owns persistence. The store refreshes wholesale after every
//! mutation and serves sorted, filtered and grouped views from memory.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::client::AdminBackend;
use crate::metrics::TEMPLATE_CACHE_SIZE;

use super::advisory::{advisories, Advisory};
use super::types::{
    Channel, ChannelOption, CreateTemplateRequest, NotificationTemplate, TemplateConfig,
    TemplateContent, TemplateError, TemplateResult, UpdateTemplateRequest,
};

/// Local filter over the cached templates. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFilter {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub channel: Option<Channel>,
    #[serde(default)]
    pub active: Option<bool>,
    /// Matched case-insensitively against name, subject and body
    #[serde(default)]
    pub search: Option<String>,
}

impl TemplateFilter {
    pub fn matches(&self, template: &NotificationTemplate) -> bool {
        if let Some(event) = self.event.as_deref().filter(|e| !e.is_empty()) {
            if template.event != event {
                return false;
            }
        }
        if self.channel.is_some_and(|c| c != template.channel) {
            return false;
        }
        if self.active.is_some_and(|a| a != template.is_active) {
            return false;
        }
        if let Some(term) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let term = term.to_lowercase();
            let fields = [
                Some(template.name.as_str()),
                template.subject.as_deref(),
                Some(template.body.as_str()),
            ];
            if !fields
                .into_iter()
                .flatten()
                .any(|f| f.to_lowercase().contains(&term))
            {
                return false;
            }
        }
        true
    }
}

/// Outcome of deleting several templates at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteManyResult {
    pub deleted: Vec<u64>,
    pub failed: Vec<u64>,
}

/// Template cache backed by the lending backend.
pub struct TemplateStore {
    backend: Arc<dyn AdminBackend>,
    templates: DashMap<u64, NotificationTemplate>,
    config: RwLock<TemplateConfig>,
    /// Held from fetch to apply so refreshes never interleave
    refresh_lock: Mutex<()>,
}

impl TemplateStore {
    pub fn new(backend: Arc<dyn AdminBackend>) -> Self {
        Self {
            backend,
            templates: DashMap::new(),
            config: RwLock::new(TemplateConfig::default()),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &Arc<dyn AdminBackend> {
        &self.backend
    }

    /// Re-fetch templates and config, replacing the cache wholesale.
    ///
    /// Entries missing from the response are dropped and the rest overwritten
    /// in place, so readers never observe an empty cache.
    pub async fn refresh(&self) -> TemplateResult<usize> {
        let _guard = self.refresh_lock.lock().await;
        let (templates, config) = futures::try_join!(
            self.backend.list_templates(),
            self.backend.template_config()
        )?;

        let fresh: HashSet<u64> = templates.iter().map(|t| t.id).collect();
        self.templates.retain(|id, _| fresh.contains(id));
        for template in templates {
            self.templates.insert(template.id, template);
        }
        *self.config.write().await = config;

        let count = self.templates.len();
        TEMPLATE_CACHE_SIZE.set(count as i64);
        tracing::debug!(count, "Template cache refreshed");

        Ok(count)
    }

    /// Cached templates sorted by event, channel, then priority (highest first).
    pub fn list(&self) -> Vec<NotificationTemplate> {
        let mut templates: Vec<NotificationTemplate> =
            self.templates.iter().map(|entry| entry.value().clone()).collect();
        templates.sort_by(|a, b| {
            a.event
                .cmp(&b.event)
                .then(a.channel.cmp(&b.channel))
                .then(b.priority.cmp(&a.priority))
                .then(a.id.cmp(&b.id))
        });
        templates
    }

    pub fn filter(&self, filter: &TemplateFilter) -> Vec<NotificationTemplate> {
        self.list()
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect()
    }

    /// Templates keyed by event, each group in list order.
    pub fn grouped_by_event(&self) -> BTreeMap<String, Vec<NotificationTemplate>> {
        let mut groups: BTreeMap<String, Vec<NotificationTemplate>> = BTreeMap::new();
        for template in self.list() {
            groups.entry(template.event.clone()).or_default().push(template);
        }
        groups
    }

    pub fn get(&self, id: u64) -> TemplateResult<NotificationTemplate> {
        self.templates
            .get(&id)
            .map(|t| t.clone())
            .ok_or(TemplateError::NotFound(id))
    }

    pub fn count(&self) -> usize {
        self.templates.len()
    }

    pub async fn config(&self) -> TemplateConfig {
        self.config.read().await.clone()
    }

    pub async fn channel(&self, channel: Channel) -> ChannelOption {
        self.config.read().await.channel(channel)
    }

    pub async fn advisories<T: TemplateContent + Sync>(&self, template: &T) -> Vec<Advisory> {
        advisories(template, &*self.config.read().await)
    }

    /// Refresh after a successful mutation. The mutation already happened, so a
    /// failed refresh only leaves the locally patched cache in place.
    async fn refresh_after_mutation(&self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "Template cache refresh after mutation failed");
        }
    }

    pub async fn create(&self, request: &CreateTemplateRequest) -> TemplateResult<NotificationTemplate> {
        request.validate()?;
        let created = self.backend.create_template(request).await?;
        tracing::info!(id = created.id, event = %created.event, channel = %created.channel, "Template created");
        self.templates.insert(created.id, created.clone());
        self.refresh_after_mutation().await;
        Ok(created)
    }

    pub async fn update(
        &self,
        id: u64,
        request: &UpdateTemplateRequest,
    ) -> TemplateResult<NotificationTemplate> {
        request.validate()?;
        let updated = self.backend.update_template(id, request).await?;
        tracing::info!(id, "Template updated");
        self.templates.insert(updated.id, updated.clone());
        self.refresh_after_mutation().await;
        Ok(updated)
    }

    /// Flip `is_active` of a cached template.
    pub async fn toggle_active(&self, id: u64) -> TemplateResult<NotificationTemplate> {
        let current = self.get(id)?;
        self.update(id, &UpdateTemplateRequest::toggle(!current.is_active))
            .await
    }

    pub async fn delete(&self, id: u64) -> TemplateResult<()> {
        self.backend.delete_template(id).await?;
        tracing::info!(id, "Template deleted");
        self.templates.remove(&id);
        self.refresh_after_mutation().await;
        Ok(())
    }

    /// Delete every id concurrently; failures do not stop the others.
    pub async fn delete_many(&self, ids: &[u64]) -> DeleteManyResult {
        let results = join_all(ids.iter().map(|&id| async move {
            (id, self.backend.delete_template(id).await)
        }))
        .await;

        let mut outcome = DeleteManyResult::default();
        for (id, result) in results {
            match result {
                Ok(()) => {
                    self.templates.remove(&id);
                    outcome.deleted.push(id);
                }
                Err(e) => {
                    tracing::warn!(id, error = %e, "Template delete failed");
                    outcome.failed.push(id);
                }
            }
        }

        self.refresh_after_mutation().await;
        outcome
    }
}
