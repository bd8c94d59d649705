//! Console staff accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    Analyst,
    Viewer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "SUPER_ADMIN",
            UserRole::Admin => "ADMIN",
            UserRole::Analyst => "ANALYST",
            UserRole::Viewer => "VIEWER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "Super administrador",
            UserRole::Admin => "Administrador",
            UserRole::Analyst => "Analista",
            UserRole::Viewer => "Consulta",
        }
    }

    /// Roles allowed to take review actions on applications
    pub fn can_review(&self) -> bool {
        !matches!(self, UserRole::Viewer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub assigned_applications_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// Whether the form creates a user or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    #[default]
    Create,
    Edit,
}

/// Create/edit form, also the request body sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<String>,
}

impl UserForm {
    /// Form prefilled from an existing user, password left empty.
    pub fn from_user(user: &AdminUser) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            is_active: user.is_active,
            password: None,
            password_confirmation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_defaults() {
        let user: AdminUser = serde_json::from_value(json!({
            "id": 3,
            "name": "Ana Torres",
            "email": "ana@example.com",
            "role": "ANALYST"
        }))
        .unwrap();

        assert!(user.is_active);
        assert_eq!(user.assigned_applications_count, 0);
        assert!(user.role.can_review());
        assert!(!UserRole::Viewer.can_review());
    }

    #[test]
    fn test_edit_form_omits_password() {
        let user = AdminUser {
            id: 1,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: None,
            role: UserRole::Admin,
            is_active: true,
            assigned_applications_count: 0,
            created_at: None,
        };
        let body = serde_json::to_value(UserForm::from_user(&user)).unwrap();
        assert!(body.get("password").is_none());
        assert_eq!(body["role"], "ADMIN");
    }
}
