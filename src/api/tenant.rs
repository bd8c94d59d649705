//! Tenant branding, API config and platform settings endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::server::AppState;
use crate::tenant::{
    mask_secrets, restore_masked_secrets, validate_api_config, validate_branding, ApiConfig,
    ApiConfigRequest, Branding, Tenant,
};

#[derive(Debug, Serialize)]
pub struct TenantListResponse {
    pub tenants: Vec<Tenant>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ApiConfigListResponse {
    pub configs: Vec<ApiConfig>,
    pub total: usize,
}

/// GET /api/v1/tenants
#[tracing::instrument(name = "http.list_tenants", skip(state))]
pub async fn list_tenants(State(state): State<AppState>) -> Result<Json<TenantListResponse>> {
    let tenants = state.backend.list_tenants().await?;
    let total = tenants.len();
    Ok(Json(TenantListResponse { tenants, total }))
}

/// PUT /api/v1/tenants/{id}/branding
#[tracing::instrument(name = "http.update_branding", skip(state, branding))]
pub async fn update_branding(
    State(state): State<AppState>,
    Path(tenant_id): Path<u64>,
    Json(branding): Json<Branding>,
) -> Result<Json<Tenant>> {
    validate_branding(&branding)?;
    Ok(Json(state.backend.update_branding(tenant_id, &branding).await?))
}

/// GET /api/v1/tenants/{id}/api-configs - Credentials masked
#[tracing::instrument(name = "http.list_api_configs", skip(state))]
pub async fn list_api_configs(
    State(state): State<AppState>,
    Path(tenant_id): Path<u64>,
) -> Result<Json<ApiConfigListResponse>> {
    let configs: Vec<ApiConfig> = state
        .backend
        .list_api_configs(tenant_id)
        .await?
        .iter()
        .map(mask_secrets)
        .collect();
    let total = configs.len();
    Ok(Json(ApiConfigListResponse { configs, total }))
}

/// POST /api/v1/tenants/{id}/api-configs
#[tracing::instrument(
    name = "http.create_api_config",
    skip(state, request),
    fields(service_type = %request.service_type, provider = %request.provider)
)]
pub async fn create_api_config(
    State(state): State<AppState>,
    Path(tenant_id): Path<u64>,
    Json(request): Json<ApiConfigRequest>,
) -> Result<(StatusCode, Json<ApiConfig>)> {
    validate_api_config(&request)?;
    let config = state.backend.save_api_config(tenant_id, None, &request).await?;
    Ok((StatusCode::CREATED, Json(mask_secrets(&config))))
}

/// PUT /api/v1/tenants/{id}/api-configs/{config_id}
///
/// Masked or omitted credentials are replaced with the stored values before the
/// backend sees the request.
#[tracing::instrument(name = "http.update_api_config", skip(state, request))]
pub async fn update_api_config(
    State(state): State<AppState>,
    Path((tenant_id, config_id)): Path<(u64, u64)>,
    Json(mut request): Json<ApiConfigRequest>,
) -> Result<Json<ApiConfig>> {
    let stored = state
        .backend
        .list_api_configs(tenant_id)
        .await?
        .into_iter()
        .find(|c| c.id == config_id)
        .ok_or_else(|| AppError::NotFound(format!("API config {}", config_id)))?;

    restore_masked_secrets(&mut request, &stored);
    validate_api_config(&request)?;

    let config = state
        .backend
        .save_api_config(tenant_id, Some(config_id), &request)
        .await?;
    Ok(Json(mask_secrets(&config)))
}

/// DELETE /api/v1/tenants/{id}/api-configs/{config_id}
#[tracing::instrument(name = "http.delete_api_config", skip(state))]
pub async fn delete_api_config(
    State(state): State<AppState>,
    Path((tenant_id, config_id)): Path<(u64, u64)>,
) -> Result<StatusCode> {
    state.backend.delete_api_config(tenant_id, config_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/settings - Platform config as returned by the backend
#[tracing::instrument(name = "http.platform_settings", skip(state))]
pub async fn platform_settings(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    Ok(Json(state.backend.platform_config().await?))
}
