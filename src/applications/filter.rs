//! Application list filters.
//!
//! All filters combine with AND. The same struct is parsed from the console's
//! query string and turned into backend list queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::client::ListQuery;

use super::types::{Application, ApplicationStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentFilter {
    #[default]
    All,
    Assigned,
    Unassigned,
}

impl AssignmentFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentFilter::All => "all",
            AssignmentFilter::Assigned => "assigned",
            AssignmentFilter::Unassigned => "unassigned",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(AssignmentFilter::All),
            "assigned" => Some(AssignmentFilter::Assigned),
            "unassigned" => Some(AssignmentFilter::Unassigned),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,

    #[serde(default)]
    pub assignment: AssignmentFilter,

    /// Staff id the application is assigned to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<u64>,

    /// Folio, applicant full name or email, case-insensitive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Inclusive, on `created_at` (UTC date)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}

impl ApplicationFilters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches(&self, application: &Application) -> bool {
        if let Some(status) = self.status {
            if application.status != status {
                return false;
            }
        }

        let assigned = application.is_assigned();
        match self.assignment {
            AssignmentFilter::Assigned if !assigned => return false,
            AssignmentFilter::Unassigned if assigned => return false,
            _ => {}
        }

        if let Some(assignee) = self.assignee {
            if application.assigned_to.as_ref().map(|s| s.id) != Some(assignee) {
                return false;
            }
        }

        if let Some(term) = self.search_term() {
            let haystacks = [
                application.folio.to_lowercase(),
                application.applicant.full_name().to_lowercase(),
                application.applicant.email.to_lowercase(),
            ];
            if !haystacks.iter().any(|h| h.contains(&term)) {
                return false;
            }
        }

        let created = application.created_at.date_naive();
        if self.date_from.is_some_and(|from| created < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| created > to) {
            return false;
        }

        true
    }

    pub fn apply(&self, applications: &[Application]) -> Vec<Application> {
        applications
            .iter()
            .filter(|a| self.matches(a))
            .cloned()
            .collect()
    }

    /// Backend list query carrying these filters.
    pub fn to_query(&self, page: u32, per_page: u32) -> ListQuery {
        let mut query = ListQuery::new(page, per_page);
        if let Some(status) = self.status {
            query = query.filter("status", status.as_str());
        }
        if self.assignment != AssignmentFilter::All {
            query = query.filter("assignment", self.assignment.as_str());
        }
        if let Some(assignee) = self.assignee {
            query = query.filter("assignee", assignee.to_string());
        }
        if let Some(search) = &self.search {
            query = query.filter("search", search.trim());
        }
        if let Some(from) = self.date_from {
            query = query.filter("date_from", from.to_string());
        }
        if let Some(to) = self.date_to {
            query = query.filter("date_to", to.to_string());
        }
        query
    }

    /// Inverse of [`to_query`](Self::to_query). Unparseable values are ignored.
    pub fn from_query(query: &ListQuery) -> Self {
        Self {
            status: query.get("status").and_then(|s| s.parse().ok()),
            assignment: query
                .get("assignment")
                .and_then(AssignmentFilter::parse)
                .unwrap_or_default(),
            assignee: query.get("assignee").and_then(|s| s.parse().ok()),
            search: query.get("search").map(str::to_string),
            date_from: query.get("date_from").and_then(|s| s.parse().ok()),
            date_to: query.get("date_to").and_then(|s| s.parse().ok()),
        }
    }
}
