use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};

use crate::server::{api_key_auth, AppState};

use super::application::{bulk_assign, bulk_reject, export_applications, list_applications};
use super::health::health;
use super::metrics::prometheus_metrics;
use super::provider::{list_providers, provider_fields, validate_provider};
use super::template::{
    create_template, delete_template, delete_templates, get_template, interpolate_text,
    list_templates, preview_content, preview_template, provision_templates, refresh_templates,
    sample_data, suggested, template_config, toggle_template, update_template,
};
use super::tenant::{
    create_api_config, delete_api_config, list_api_configs, list_tenants, platform_settings,
    update_api_config, update_branding,
};
use super::user::{
    create_user, delete_user, list_users, toggle_user_active, update_user, validate_user,
};

pub fn api_routes(state: AppState) -> Router<AppState> {
    let v1 = Router::new()
        // Templates
        .route("/templates", get(list_templates).post(create_template))
        .route("/templates/refresh", post(refresh_templates))
        .route("/templates/config", get(template_config))
        .route("/templates/variables", get(sample_data))
        .route("/templates/suggested", get(suggested))
        .route("/templates/preview", post(preview_content))
        .route("/templates/interpolate", post(interpolate_text))
        .route("/templates/provision", post(provision_templates))
        .route("/templates/delete-many", post(delete_templates))
        .route(
            "/templates/{id}",
            get(get_template).put(update_template).delete(delete_template),
        )
        .route("/templates/{id}/preview", get(preview_template))
        .route("/templates/{id}/toggle", patch(toggle_template))
        // Applications
        .route("/applications", get(list_applications))
        .route("/applications/bulk-assign", post(bulk_assign))
        .route("/applications/bulk-reject", post(bulk_reject))
        .route("/applications/export", get(export_applications))
        // Users
        .route("/users", get(list_users).post(create_user))
        .route("/users/validate", post(validate_user))
        .route("/users/{id}", put(update_user).delete(delete_user))
        .route("/users/{id}/toggle-active", patch(toggle_user_active))
        // Tenants & settings
        .route("/tenants", get(list_tenants))
        .route("/tenants/{id}/branding", put(update_branding))
        .route(
            "/tenants/{id}/api-configs",
            get(list_api_configs).post(create_api_config),
        )
        .route(
            "/tenants/{id}/api-configs/{config_id}",
            put(update_api_config).delete(delete_api_config),
        )
        .route("/settings", get(platform_settings))
        // Provider catalog
        .route("/providers", get(list_providers))
        .route("/providers/{service}/{provider}/fields", get(provider_fields))
        .route("/providers/{service}/{provider}/validate", post(validate_provider))
        .route_layer(middleware::from_fn_with_state(state, api_key_auth));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .nest("/api/v1", v1)
}
