//! Notification template endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::server::AppState;
use crate::template::{
    card_preview, full_preview, interpolate, sample_variables, suggested_templates,
    variables_from_json, Advisory, Channel, CreateTemplateRequest, DeleteManyResult, FullPreview,
    NotificationTemplate, ProvisionMode, ProvisionReport, TemplateConfig, TemplateContent,
    TemplateFilter, UpdateTemplateRequest, Variables,
};

#[derive(Debug, Serialize)]
pub struct TemplateSummary {
    #[serde(flatten)]
    pub template: NotificationTemplate,
    pub event_label: String,
    /// Plain-text excerpt rendered with sample data
    pub preview: String,
}

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct TemplateDetailResponse {
    pub template: NotificationTemplate,
    pub advisories: Vec<Advisory>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    #[serde(flatten)]
    pub preview: FullPreview,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
    pub advisories: Vec<Advisory>,
}

/// Unsaved template content to preview.
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub event: String,
    #[serde(default = "default_preview_channel")]
    pub channel: Channel,
    #[serde(default)]
    pub subject: Option<String>,
    pub body: String,
    #[serde(default)]
    pub html_body: Option<String>,
}

fn default_preview_channel() -> Channel {
    Channel::Email
}

impl TemplateContent for PreviewRequest {
    fn event(&self) -> &str {
        &self.event
    }
    fn channel(&self) -> Channel {
        self.channel
    }
    fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }
    fn body(&self) -> &str {
        &self.body
    }
    fn html_body(&self) -> Option<&str> {
        self.html_body.as_deref()
    }
}

#[derive(Debug, Deserialize)]
pub struct InterpolateRequest {
    pub template: String,
    /// Dotted keys to values; merged over the sample data
    #[serde(default)]
    pub variables: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct InterpolateResponse {
    pub rendered: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProvisionRequest {
    #[serde(default)]
    pub mode: ProvisionMode,
}

#[derive(Debug, Deserialize)]
pub struct DeleteManyRequest {
    pub ids: Vec<u64>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SuggestedResponse {
    pub templates: Vec<CreateTemplateRequest>,
    pub total: usize,
}

async fn preview_response<T: TemplateContent + Sync>(state: &AppState, template: &T) -> PreviewResponse {
    let preview = full_preview(template);
    let frame = preview.frame_markup();
    PreviewResponse {
        preview,
        frame,
        advisories: state.template_store.advisories(template).await,
    }
}

/// GET /api/v1/templates - Cached templates, optionally filtered
#[tracing::instrument(name = "http.list_templates", skip(state))]
pub async fn list_templates(
    State(state): State<AppState>,
    Query(filter): Query<TemplateFilter>,
) -> Json<TemplateListResponse> {
    let config = state.template_store.config().await;
    let max_chars = state.settings.console.card_preview_chars;

    let templates: Vec<TemplateSummary> = state
        .template_store
        .filter(&filter)
        .into_iter()
        .map(|template| TemplateSummary {
            event_label: config.event_label(&template.event).to_string(),
            preview: card_preview(&template, max_chars),
            template,
        })
        .collect();
    let total = templates.len();

    Json(TemplateListResponse { templates, total })
}

/// POST /api/v1/templates/refresh - Reload the cache from the backend
#[tracing::instrument(name = "http.refresh_templates", skip(state))]
pub async fn refresh_templates(State(state): State<AppState>) -> Result<Json<RefreshResponse>> {
    let total = state.template_store.refresh().await?;
    Ok(Json(RefreshResponse { total }))
}

/// GET /api/v1/templates/config
pub async fn template_config(State(state): State<AppState>) -> Json<TemplateConfig> {
    Json(state.template_store.config().await)
}

/// GET /api/v1/templates/variables - Sample values used by previews
pub async fn sample_data() -> Json<Variables> {
    Json(sample_variables().clone())
}

/// GET /api/v1/templates/suggested - The built-in catalog
pub async fn suggested() -> Json<SuggestedResponse> {
    let templates = suggested_templates();
    let total = templates.len();
    Json(SuggestedResponse { templates, total })
}

/// POST /api/v1/templates - Create a template
#[tracing::instrument(
    name = "http.create_template",
    skip(state, request),
    fields(event = %request.event, channel = %request.channel)
)]
pub async fn create_template(
    State(state): State<AppState>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<TemplateDetailResponse>)> {
    let template = state.template_store.create(&request).await?;
    let advisories = state.template_store.advisories(&template).await;
    Ok((StatusCode::CREATED, Json(TemplateDetailResponse { template, advisories })))
}

/// GET /api/v1/templates/{id}
#[tracing::instrument(name = "http.get_template", skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<TemplateDetailResponse>> {
    let template = state.template_store.get(id)?;
    let advisories = state.template_store.advisories(&template).await;
    Ok(Json(TemplateDetailResponse { template, advisories }))
}

/// PUT /api/v1/templates/{id}
#[tracing::instrument(name = "http.update_template", skip(state, request))]
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateTemplateRequest>,
) -> Result<Json<TemplateDetailResponse>> {
    let template = state.template_store.update(id, &request).await?;
    let advisories = state.template_store.advisories(&template).await;
    Ok(Json(TemplateDetailResponse { template, advisories }))
}

/// PATCH /api/v1/templates/{id}/toggle - Flip is_active
#[tracing::instrument(name = "http.toggle_template", skip(state))]
pub async fn toggle_template(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<NotificationTemplate>> {
    Ok(Json(state.template_store.toggle_active(id).await?))
}

/// DELETE /api/v1/templates/{id}
#[tracing::instrument(name = "http.delete_template", skip(state))]
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    state.template_store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/templates/delete-many
#[tracing::instrument(name = "http.delete_templates", skip(state, request), fields(count = request.ids.len()))]
pub async fn delete_templates(
    State(state): State<AppState>,
    Json(request): Json<DeleteManyRequest>,
) -> Json<DeleteManyResult> {
    Json(state.template_store.delete_many(&request.ids).await)
}

/// GET /api/v1/templates/{id}/preview - Stored template rendered with sample data
#[tracing::instrument(name = "http.preview_template", skip(state))]
pub async fn preview_template(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PreviewResponse>> {
    let template = state.template_store.get(id)?;
    Ok(Json(preview_response(&state, &template).await))
}

/// POST /api/v1/templates/preview - Unsaved content rendered with sample data
#[tracing::instrument(name = "http.preview_content", skip(state, request))]
pub async fn preview_content(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Json<PreviewResponse> {
    Json(preview_response(&state, &request).await)
}

/// POST /api/v1/templates/interpolate - Fill placeholders with caller values
#[tracing::instrument(name = "http.interpolate", skip(request))]
pub async fn interpolate_text(Json(request): Json<InterpolateRequest>) -> Result<Json<InterpolateResponse>> {
    let mut variables = sample_variables().clone();
    if let Some(values) = &request.variables {
        variables.extend(variables_from_json(values)?);
    }
    Ok(Json(InterpolateResponse {
        rendered: interpolate(&request.template, &variables),
    }))
}

/// POST /api/v1/templates/provision - Bulk-create the suggested catalog
///
/// 200 with the report when every request succeeded, 502 with the partial
/// report otherwise.
#[tracing::instrument(name = "http.provision_templates", skip(state, request), fields(mode = request.mode.as_str()))]
pub async fn provision_templates(
    State(state): State<AppState>,
    Json(request): Json<ProvisionRequest>,
) -> (StatusCode, Json<ProvisionReport>) {
    let report = state.provisioner.provision(request.mode).await;

    if let Err(e) = state.template_store.refresh().await {
        tracing::warn!(error = %e, "Template cache refresh after provisioning failed");
    }

    let status = if report.is_complete() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, Json(report))
}
