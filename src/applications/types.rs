//! Loan application model

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a loan application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    InReview,
    DocsPending,
    CorrectionsRequested,
    Approved,
    Rejected,
    Cancelled,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 8] = [
        ApplicationStatus::Draft,
        ApplicationStatus::Submitted,
        ApplicationStatus::InReview,
        ApplicationStatus::DocsPending,
        ApplicationStatus::CorrectionsRequested,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
        ApplicationStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "DRAFT",
            ApplicationStatus::Submitted => "SUBMITTED",
            ApplicationStatus::InReview => "IN_REVIEW",
            ApplicationStatus::DocsPending => "DOCS_PENDING",
            ApplicationStatus::CorrectionsRequested => "CORRECTIONS_REQUESTED",
            ApplicationStatus::Approved => "APPROVED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Cancelled => "CANCELLED",
        }
    }

    /// Spanish display label
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "Borrador",
            ApplicationStatus::Submitted => "Enviada",
            ApplicationStatus::InReview => "En revisión",
            ApplicationStatus::DocsPending => "Documentos pendientes",
            ApplicationStatus::CorrectionsRequested => "Correcciones solicitadas",
            ApplicationStatus::Approved => "Aprobada",
            ApplicationStatus::Rejected => "Rechazada",
            ApplicationStatus::Cancelled => "Cancelada",
        }
    }

    /// No further review actions apply.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Approved | ApplicationStatus::Rejected | ApplicationStatus::Cancelled
        )
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown application status: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Applicant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Staff member an application is assigned to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffRef {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: u64,

    /// Human-readable number, e.g. `SOL-2024-000123`
    pub folio: String,

    pub applicant: Applicant,

    pub product_name: String,

    pub requested_amount: f64,

    pub term_months: u32,

    pub status: ApplicationStatus,

    #[serde(default)]
    pub assigned_to: Option<StaffRef>,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Application {
    pub fn is_assigned(&self) -> bool {
        self.assigned_to.is_some()
    }
}

/// Body of `POST /admin/applications/{id}/assign`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRequest {
    pub assigned_to: u64,
}

/// Body of `POST /admin/applications/{id}/reject`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

/// Number of applications per status, every status present.
pub fn group_by_status(applications: &[Application]) -> BTreeMap<ApplicationStatus, usize> {
    let mut counts: BTreeMap<ApplicationStatus, usize> =
        ApplicationStatus::ALL.into_iter().map(|s| (s, 0)).collect();
    for application in applications {
        *counts.entry(application.status).or_default() += 1;
    }
    counts
}
