//! Applications list view state.
//!
//! Holds the filters, pager, current page of rows and the bulk selection. Every
//! refetch takes a generation token from a [`RequestSequencer`]; responses for
//! anything but the latest issued request are dropped.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::client::{AdminBackend, ClientError, ClientResult};
use crate::config::ConsoleConfig;
use crate::listing::{Debouncer, Pager, RequestSequencer};

use super::bulk::{self, BulkAction, BulkOutcome, Selection};
use super::filter::ApplicationFilters;
use super::types::Application;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("No applications selected")]
    EmptySelection,

    #[error("Invalid bulk action: {0}")]
    InvalidAction(String),

    #[error(transparent)]
    Backend(#[from] ClientError),
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewState {
    pub filters: ApplicationFilters,
    pub pager: Pager,
    pub items: Vec<Application>,
    pub selection: Selection,
    /// Display text of the last failed load
    pub error: Option<String>,
}

pub struct ApplicationsView {
    backend: Arc<dyn AdminBackend>,
    state: RwLock<ViewState>,
    sequencer: RequestSequencer,
    debouncer: Debouncer,
}

impl ApplicationsView {
    pub fn new(backend: Arc<dyn AdminBackend>, per_page: u32, debouncer: Debouncer) -> Self {
        Self {
            backend,
            state: RwLock::new(ViewState {
                filters: ApplicationFilters::default(),
                pager: Pager::new(per_page),
                items: Vec::new(),
                selection: Selection::new(),
                error: None,
            }),
            sequencer: RequestSequencer::new(),
            debouncer,
        }
    }

    /// View using the configured page size and the clamped search debounce.
    pub fn from_settings(backend: Arc<dyn AdminBackend>, console: &ConsoleConfig) -> Self {
        Self::new(
            backend,
            console.per_page,
            Debouncer::new(console.search_debounce()),
        )
    }

    pub fn search_delay(&self) -> Duration {
        self.debouncer.delay()
    }

    pub async fn snapshot(&self) -> ViewState {
        self.state.read().await.clone()
    }

    /// Reload the current page.
    pub async fn load(&self) -> ClientResult<bool> {
        let page = self.state.read().await.pager.current_page;
        self.fetch(page).await
    }

    /// Load `page`; outside `1..=last_page` nothing is requested.
    pub async fn go_to_page(&self, page: u32) -> ClientResult<bool> {
        let target = self.state.read().await.pager.go_to_page(page);
        match target {
            Some(page) => self.fetch(page).await,
            None => {
                tracing::debug!(page, "Page out of range, ignoring");
                Ok(false)
            }
        }
    }

    /// Replace the filters and reload from the first page.
    pub async fn set_filters(&self, filters: ApplicationFilters) -> ClientResult<bool> {
        self.state.write().await.filters = filters;
        self.fetch(1).await
    }

    /// Debounced search: only the last term within the delay triggers a fetch.
    pub async fn set_search(self: &Arc<Self>, term: impl Into<String>) {
        let term = term.into();
        let view = Arc::clone(self);
        self.debouncer
            .call(async move {
                view.state.write().await.filters.search = Some(term);
                if let Err(e) = view.fetch(1).await {
                    tracing::warn!(error = %e, "Search refetch failed");
                }
            })
            .await;
    }

    /// Returns whether the response was applied (false when superseded).
    async fn fetch(&self, page: u32) -> ClientResult<bool> {
        let query = {
            let state = self.state.read().await;
            state.filters.to_query(page, state.pager.per_page)
        };

        let generation = self.sequencer.issue();
        let result = self.backend.list_applications(&query).await;
        if !self.sequencer.accept(generation) {
            return Ok(false);
        }

        let mut state = self.state.write().await;
        match result {
            Ok(page) => {
                state.pager = Pager::from_meta(&page.meta, state.pager.per_page);
                state.items = page.data;
                state.error = None;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Applications load failed");
                state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub async fn toggle_selected(&self, id: u64) -> bool {
        self.state.write().await.selection.toggle(id)
    }

    pub async fn select_page(&self) {
        let state = &mut *self.state.write().await;
        state.selection.select_all(&state.items);
    }

    pub async fn bulk_assign(&self, assignee_id: u64) -> Result<BulkOutcome, ViewError> {
        self.bulk(BulkAction::Assign { assignee_id }).await
    }

    pub async fn bulk_reject(&self, reason: impl Into<String>) -> Result<BulkOutcome, ViewError> {
        self.bulk(BulkAction::Reject {
            reason: reason.into(),
        })
        .await
    }

    /// Run `action` over the selection, clear it, then refetch the page.
    async fn bulk(&self, action: BulkAction) -> Result<BulkOutcome, ViewError> {
        action.validate().map_err(ViewError::InvalidAction)?;
        let ids = self.state.read().await.selection.ids();
        if ids.is_empty() {
            return Err(ViewError::EmptySelection);
        }

        let outcome = bulk::execute(self.backend.as_ref(), &action, &ids).await;
        self.state.write().await.selection.clear();

        if let Err(e) = self.load().await {
            tracing::warn!(error = %e, "Refetch after bulk operation failed");
        }
        Ok(outcome)
    }

    /// Every application matching the current filters, for export.
    pub async fn export_rows(&self) -> ClientResult<Vec<Application>> {
        let (filters, per_page) = {
            let state = self.state.read().await;
            (state.filters.clone(), state.pager.per_page)
        };
        fetch_all(self.backend.as_ref(), &filters, per_page).await
    }
}

/// Walk every page of the filtered list.
pub async fn fetch_all(
    backend: &dyn AdminBackend,
    filters: &ApplicationFilters,
    per_page: u32,
) -> ClientResult<Vec<Application>> {
    let mut rows = Vec::new();
    let mut page = 1;
    loop {
        let result = backend
            .list_applications(&filters.to_query(page, per_page))
            .await?;
        let last_page = result.meta.last_page;
        rows.extend(result.data);
        if page >= last_page {
            break;
        }
        page += 1;
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::ApplicationStatus;
    use crate::client::{Fault, MemoryBackend};

    fn view(backend: &Arc<MemoryBackend>, per_page: u32) -> Arc<ApplicationsView> {
        Arc::new(ApplicationsView::new(
            backend.clone(),
            per_page,
            Debouncer::new(Duration::from_millis(300)),
        ))
    }

    #[tokio::test]
    async fn test_load_and_paging() {
        let backend = Arc::new(MemoryBackend::with_demo_data());
        let view = view(&backend, 2);

        assert!(view.load().await.unwrap());
        let state = view.snapshot().await;
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.pager.last_page, 3);

        assert!(view.go_to_page(3).await.unwrap());
        assert_eq!(view.snapshot().await.pager.current_page, 3);
    }

    #[tokio::test]
    async fn test_go_to_page_out_of_range_issues_no_request() {
        let backend = Arc::new(MemoryBackend::with_demo_data());
        let view = view(&backend, 2);
        view.load().await.unwrap();
        let before = backend.calls("list_applications");

        assert!(!view.go_to_page(4).await.unwrap());
        assert!(!view.go_to_page(0).await.unwrap());
        assert_eq!(backend.calls("list_applications"), before);
        assert_eq!(view.snapshot().await.pager.current_page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        let backend = Arc::new(MemoryBackend::with_demo_data());
        backend.delay_call("list_applications", 1, Duration::from_millis(200));
        let view = view(&backend, 20);

        let approved = ApplicationFilters {
            status: Some(ApplicationStatus::Approved),
            ..Default::default()
        };
        let (first, second) = tokio::join!(view.load(), async {
            tokio::task::yield_now().await;
            view.set_filters(approved).await
        });

        assert!(!first.unwrap());
        assert!(second.unwrap());
        let state = view.snapshot().await;
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].status, ApplicationStatus::Approved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_is_debounced() {
        let backend = Arc::new(MemoryBackend::with_demo_data());
        let view = view(&backend, 20);

        view.set_search("mar").await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        view.set_search("maría").await;
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(backend.calls("list_applications"), 1);
        let state = view.snapshot().await;
        assert_eq!(state.filters.search.as_deref(), Some("maría"));
        assert_eq!(state.items.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_from_settings_uses_console_config() {
        let backend = Arc::new(MemoryBackend::with_demo_data());
        let console = ConsoleConfig {
            search_debounce_ms: 2_000,
            per_page: 4,
            ..Default::default()
        };
        let view = Arc::new(ApplicationsView::from_settings(backend.clone(), &console));
        assert_eq!(view.search_delay(), Duration::from_millis(500));

        view.set_search("elena").await;
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(backend.calls("list_applications"), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(backend.calls("list_applications"), 1);
        let state = view.snapshot().await;
        assert_eq!(state.pager.per_page, 4);
        assert_eq!(state.items.len(), 1);
    }

    #[tokio::test]
    async fn test_bulk_assign_clears_selection_and_refetches() {
        let backend = Arc::new(MemoryBackend::with_demo_data());
        backend.fail_for("assign_application", 4, Fault::Transport);
        let view = view(&backend, 20);
        view.load().await.unwrap();

        view.toggle_selected(1).await;
        view.toggle_selected(4).await;
        let outcome = view.bulk_assign(2).await.unwrap();

        assert_eq!((outcome.succeeded, outcome.failed), (1, 1));
        let state = view.snapshot().await;
        assert!(state.selection.is_empty());
        assert_eq!(backend.calls("list_applications"), 2);
        assert_eq!(state.items[0].assigned_to.as_ref().unwrap().id, 2);
    }

    #[tokio::test]
    async fn test_bulk_requires_selection_and_reason() {
        let backend = Arc::new(MemoryBackend::with_demo_data());
        let view = view(&backend, 20);

        assert!(matches!(view.bulk_assign(1).await, Err(ViewError::EmptySelection)));
        view.toggle_selected(1).await;
        assert!(matches!(
            view.bulk_reject("  ").await,
            Err(ViewError::InvalidAction(_))
        ));
        assert_eq!(backend.calls("reject_application"), 0);
    }

    #[tokio::test]
    async fn test_export_rows_walks_all_pages() {
        let backend = Arc::new(MemoryBackend::with_demo_data());
        let view = view(&backend, 4);
        view.load().await.unwrap();

        let rows = view.export_rows().await.unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(backend.calls("list_applications"), 3);
    }
}
