//! Provider catalog endpoints for the API-config form.

use std::collections::BTreeMap;

use axum::{extract::Path, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::tenant::{
    provider, providers, validate_api_config, ApiConfigRequest, FieldSpec, ProviderSpec,
    ServiceType,
};

#[derive(Debug, Serialize)]
pub struct ProviderListResponse {
    pub providers: &'static [ProviderSpec],
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ProviderFieldsResponse {
    pub service_type: ServiceType,
    pub provider: &'static str,
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

/// Form values for one provider.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderFormValues {
    #[serde(default)]
    pub credentials: BTreeMap<String, String>,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct ProviderValidationResponse {
    pub valid: bool,
    pub errors: BTreeMap<String, Vec<String>>,
}

fn lookup(service: &str, name: &str) -> Result<&'static ProviderSpec> {
    let service_type: ServiceType = service.parse().map_err(AppError::Validation)?;
    provider(service_type, name).ok_or_else(|| {
        AppError::NotFound(format!("Provider '{}' for {}", name, service_type))
    })
}

/// GET /api/v1/providers
pub async fn list_providers() -> Json<ProviderListResponse> {
    let providers = providers();
    Json(ProviderListResponse {
        providers,
        total: providers.len(),
    })
}

/// GET /api/v1/providers/{service}/{provider}/fields
pub async fn provider_fields(
    Path((service, name)): Path<(String, String)>,
) -> Result<Json<ProviderFieldsResponse>> {
    let spec = lookup(&service, &name)?;
    Ok(Json(ProviderFieldsResponse {
        service_type: spec.service_type,
        provider: spec.provider,
        name: spec.name,
        fields: spec.fields,
    }))
}

/// POST /api/v1/providers/{service}/{provider}/validate
#[tracing::instrument(name = "http.validate_provider", skip(values))]
pub async fn validate_provider(
    Path((service, name)): Path<(String, String)>,
    Json(values): Json<ProviderFormValues>,
) -> Result<Json<ProviderValidationResponse>> {
    let spec = lookup(&service, &name)?;
    let request = ApiConfigRequest {
        service_type: spec.service_type,
        provider: spec.provider.to_string(),
        is_active: true,
        is_sandbox: false,
        credentials: values.credentials,
        settings: values.settings,
    };

    let errors = match validate_api_config(&request) {
        Ok(()) => BTreeMap::new(),
        Err(e) => e.fields,
    };
    Ok(Json(ProviderValidationResponse {
        valid: errors.is_empty(),
        errors,
    }))
}
