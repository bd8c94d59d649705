//! Loan application endpoints: filtered listing, bulk actions, CSV export.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::applications::{
    execute_selection, export_csv, export_filename, fetch_all, Application, ApplicationFilters,
    BulkAction, BulkOutcome, Selection,
};
use crate::client::{ListQuery, Paginated};
use crate::error::{AppError, Result};
use crate::server::AppState;

/// Page size used when walking every page for an export.
const EXPORT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct BulkAssignRequest {
    pub application_ids: Vec<u64>,
    pub assignee_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct BulkRejectRequest {
    pub application_ids: Vec<u64>,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct BulkResponse {
    #[serde(flatten)]
    pub outcome: BulkOutcome,
    pub message: String,
}

/// `page`/`per_page` plus the remaining pairs as filters.
pub(crate) fn list_query(params: &HashMap<String, String>, default_per_page: u32) -> ListQuery {
    let page = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let per_page = params
        .get("per_page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(default_per_page);

    params
        .iter()
        .filter(|(key, _)| key.as_str() != "page" && key.as_str() != "per_page")
        .fold(ListQuery::new(page, per_page), |query, (key, value)| {
            query.filter(key, value.as_str())
        })
}

/// GET /api/v1/applications
#[tracing::instrument(name = "http.list_applications", skip(state, params))]
pub async fn list_applications(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Paginated<Application>>> {
    let query = list_query(&params, state.settings.console.per_page);
    let filters = ApplicationFilters::from_query(&query);
    let page = state
        .backend
        .list_applications(&filters.to_query(query.page, query.per_page))
        .await?;
    Ok(Json(page))
}

async fn run_bulk(state: &AppState, action: BulkAction, ids: Vec<u64>) -> Result<Json<BulkResponse>> {
    action.validate().map_err(AppError::Validation)?;
    if ids.is_empty() {
        return Err(AppError::Validation(
            "Selecciona al menos una solicitud.".to_string(),
        ));
    }

    let mut selection = Selection::new();
    for id in ids {
        selection.select(id);
    }
    let outcome = execute_selection(state.backend.as_ref(), &action, &mut selection).await;

    Ok(Json(BulkResponse {
        message: outcome.message(),
        outcome,
    }))
}

/// POST /api/v1/applications/bulk-assign
#[tracing::instrument(
    name = "http.bulk_assign",
    skip(state, request),
    fields(count = request.application_ids.len(), assignee_id = request.assignee_id)
)]
pub async fn bulk_assign(
    State(state): State<AppState>,
    Json(request): Json<BulkAssignRequest>,
) -> Result<Json<BulkResponse>> {
    let action = BulkAction::Assign {
        assignee_id: request.assignee_id,
    };
    run_bulk(&state, action, request.application_ids).await
}

/// POST /api/v1/applications/bulk-reject
#[tracing::instrument(
    name = "http.bulk_reject",
    skip(state, request),
    fields(count = request.application_ids.len())
)]
pub async fn bulk_reject(
    State(state): State<AppState>,
    Json(request): Json<BulkRejectRequest>,
) -> Result<Json<BulkResponse>> {
    let action = BulkAction::Reject {
        reason: request.reason,
    };
    run_bulk(&state, action, request.application_ids).await
}

/// GET /api/v1/applications/export - Every matching application as CSV
#[tracing::instrument(name = "http.export_applications", skip(state, params))]
pub async fn export_applications(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse> {
    let filters = ApplicationFilters::from_query(&list_query(&params, EXPORT_PAGE_SIZE));
    let rows = fetch_all(state.backend.as_ref(), &filters, EXPORT_PAGE_SIZE).await?;
    let body = export_csv(&rows)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(Utc::now().date_naive())
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
