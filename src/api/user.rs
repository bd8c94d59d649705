//! Console staff user endpoints.

use std::collections::{BTreeMap, HashMap};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::client::Paginated;
use crate::error::Result;
use crate::server::AppState;
use crate::users::{password_strength, validate_user_form, AdminUser, FormMode, PasswordStrength, UserForm};

use super::application::list_query;

#[derive(Debug, Deserialize)]
pub struct ValidateUserRequest {
    #[serde(default)]
    pub mode: FormMode,
    pub form: UserForm,
}

#[derive(Debug, Serialize)]
pub struct ValidateUserResponse {
    pub valid: bool,
    pub errors: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<PasswordStrength>,
}

/// GET /api/v1/users - `?search=&role=&page=&per_page=`
#[tracing::instrument(name = "http.list_users", skip(state, params))]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Paginated<AdminUser>>> {
    let query = list_query(&params, state.settings.console.per_page);
    Ok(Json(state.backend.list_users(&query).await?))
}

/// POST /api/v1/users/validate - Field errors and password score, no backend call
pub async fn validate_user(Json(request): Json<ValidateUserRequest>) -> Json<ValidateUserResponse> {
    let errors = match validate_user_form(&request.form, request.mode) {
        Ok(()) => BTreeMap::new(),
        Err(e) => e.fields,
    };
    let password = request
        .form
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(password_strength);

    Json(ValidateUserResponse {
        valid: errors.is_empty(),
        errors,
        password,
    })
}

/// POST /api/v1/users
#[tracing::instrument(name = "http.create_user", skip(state, form), fields(email = %form.email))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(form): Json<UserForm>,
) -> Result<(StatusCode, Json<AdminUser>)> {
    validate_user_form(&form, FormMode::Create)?;
    let user = state.backend.create_user(&form).await?;
    tracing::info!(user_id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/v1/users/{id}
#[tracing::instrument(name = "http.update_user", skip(state, form))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(form): Json<UserForm>,
) -> Result<Json<AdminUser>> {
    validate_user_form(&form, FormMode::Edit)?;
    Ok(Json(state.backend.update_user(id, &form).await?))
}

/// DELETE /api/v1/users/{id}
///
/// Users with assigned applications are refused by the backend (409).
#[tracing::instrument(name = "http.delete_user", skip(state))]
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<u64>) -> Result<StatusCode> {
    state.backend.delete_user(id).await?;
    tracing::info!(user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/users/{id}/toggle-active
#[tracing::instrument(name = "http.toggle_user", skip(state))]
pub async fn toggle_user_active(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<AdminUser>> {
    Ok(Json(state.backend.toggle_user_active(id).await?))
}
