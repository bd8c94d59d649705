//! Loan applications: model, filters, list view, bulk actions and CSV export.

pub mod bulk;
pub mod export;
pub mod filter;
pub mod types;
pub mod view;

pub use bulk::{execute_selection, BulkAction, BulkFailure, BulkOutcome, Selection};
pub use export::{export_csv, export_filename, ExportError};
pub use filter::{ApplicationFilters, AssignmentFilter};
pub use types::{
    group_by_status, Applicant, Application, ApplicationStatus, AssignRequest, RejectRequest,
    StaffRef,
};
pub use view::{fetch_all, ApplicationsView, ViewError, ViewState};
