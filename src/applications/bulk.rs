//! Bulk assign/reject over a selection of applications.
//!
//! One request per application, all issued concurrently and all awaited: a
//! failing item never cancels the rest.

use std::collections::BTreeSet;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::client::AdminBackend;
use crate::metrics::BulkMetrics;

use super::types::Application;

/// Ids of the applications checked in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    ids: BTreeSet<u64>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one id; returns whether it is now selected.
    pub fn toggle(&mut self, id: u64) -> bool {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
            true
        } else {
            false
        }
    }

    pub fn select(&mut self, id: u64) {
        self.ids.insert(id);
    }

    /// Select every application on the current page.
    pub fn select_all(&mut self, applications: &[Application]) {
        self.ids.extend(applications.iter().map(|a| a.id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.ids.iter().copied().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum BulkAction {
    Assign { assignee_id: u64 },
    Reject { reason: String },
}

impl BulkAction {
    pub fn name(&self) -> &'static str {
        match self {
            BulkAction::Assign { .. } => "assign",
            BulkAction::Reject { .. } => "reject",
        }
    }

    /// Text for the confirmation prompt shown before running.
    pub fn confirmation(&self, count: usize) -> String {
        match self {
            BulkAction::Assign { .. } => {
                format!("¿Asignar {} solicitud(es) al analista seleccionado?", count)
            }
            BulkAction::Reject { .. } => format!(
                "¿Rechazar {} solicitud(es)? Esta acción no se puede deshacer.",
                count
            ),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            BulkAction::Reject { reason } if reason.trim().is_empty() => {
                Err("El motivo de rechazo es obligatorio.".to_string())
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkFailure {
    pub id: u64,
    /// Spanish display text
    pub message: String,
}

/// Aggregate result of a bulk run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub action: &'static str,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<BulkFailure>,
}

impl BulkOutcome {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Feedback line for the console.
    pub fn message(&self) -> String {
        if self.failed == 0 {
            format!("{} solicitud(es) actualizada(s) correctamente.", self.succeeded)
        } else if self.succeeded == 0 {
            format!("No se pudo actualizar ninguna de las {} solicitud(es).", self.failed)
        } else {
            format!(
                "{} solicitud(es) actualizada(s), {} con error.",
                self.succeeded, self.failed
            )
        }
    }
}

/// Run `action` on every id concurrently and wait for all of them.
pub async fn execute(backend: &dyn AdminBackend, action: &BulkAction, ids: &[u64]) -> BulkOutcome {
    let results = join_all(ids.iter().map(|&id| async move {
        let result = match action {
            BulkAction::Assign { assignee_id } => backend.assign_application(id, *assignee_id).await,
            BulkAction::Reject { reason } => backend.reject_application(id, reason).await,
        };
        (id, result)
    }))
    .await;

    let mut outcome = BulkOutcome {
        action: action.name(),
        succeeded: 0,
        failed: 0,
        failures: Vec::new(),
    };
    for (id, result) in results {
        match result {
            Ok(_) => outcome.succeeded += 1,
            Err(e) => {
                tracing::warn!(action = action.name(), id, error = %e, "Bulk item failed");
                outcome.failed += 1;
                outcome.failures.push(BulkFailure {
                    id,
                    message: e.user_message(),
                });
            }
        }
    }

    BulkMetrics::record(action.name(), outcome.succeeded, outcome.failed);
    tracing::info!(
        action = action.name(),
        succeeded = outcome.succeeded,
        failed = outcome.failed,
        "Bulk operation finished"
    );

    outcome
}

/// Run `action` over `selection`, clearing it once every request settled.
pub async fn execute_selection(
    backend: &dyn AdminBackend,
    action: &BulkAction,
    selection: &mut Selection,
) -> BulkOutcome {
    let outcome = execute(backend, action, &selection.ids()).await;
    selection.clear();
    outcome
}
