pub mod messages;

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::applications::ExportError;
use crate::client::ClientError;
use crate::config::Settings;
use crate::template::TemplateError;
use crate::validation::FormErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Form validation failed: {0}")]
    Form(#[from] FormErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend error: {0}")]
    Backend(#[from] ClientError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, Vec<String>>>,
}

struct ErrorParts {
    status: StatusCode,
    code: &'static str,
    client_message: String,
    fields: Option<BTreeMap<String, Vec<String>>>,
}

fn internal(code: &'static str, detail: String, public: &str) -> ErrorParts {
    ErrorParts {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code,
        client_message: if Settings::is_production() {
            public.to_string()
        } else {
            detail
        },
        fields: None,
    }
}

fn backend_parts(err: &ClientError) -> ErrorParts {
    let (status, code) = match err {
        ClientError::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "BACKEND_VALIDATION"),
        ClientError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ClientError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "BACKEND_UNAUTHORIZED"),
        ClientError::Rejected { status, .. } if (400..500).contains(status) => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST),
            "BACKEND_REJECTED",
        ),
        ClientError::Rejected { .. } | ClientError::Decode(_) => {
            (StatusCode::BAD_GATEWAY, "BACKEND_ERROR")
        }
        ClientError::Transport(_) => (StatusCode::BAD_GATEWAY, "BACKEND_UNREACHABLE"),
        ClientError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
    };

    ErrorParts {
        status,
        code,
        client_message: err.user_message(),
        fields: err.field_errors().cloned(),
    }
}

impl AppError {
    fn parts(&self) -> ErrorParts {
        match self {
            AppError::Config(e) => internal("CONFIG_ERROR", e.to_string(), "Configuration error"),
            AppError::Validation(msg) => ErrorParts {
                status: StatusCode::BAD_REQUEST,
                code: "VALIDATION_ERROR",
                client_message: msg.clone(),
                fields: None,
            },
            AppError::Form(errors) => ErrorParts {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                code: "VALIDATION_ERROR",
                client_message: messages::VALIDATION_ERROR.to_string(),
                fields: Some(errors.fields.clone()),
            },
            AppError::NotFound(msg) => ErrorParts {
                status: StatusCode::NOT_FOUND,
                code: "NOT_FOUND",
                client_message: msg.clone(),
                fields: None,
            },
            AppError::Backend(e) => backend_parts(e),
            AppError::Template(TemplateError::Backend(e)) => backend_parts(e),
            AppError::Template(e) => {
                let (status, code) = match e {
                    TemplateError::NotFound(_) => (StatusCode::NOT_FOUND, "TEMPLATE_NOT_FOUND"),
                    TemplateError::InvalidTemplate(_) => {
                        (StatusCode::BAD_REQUEST, "INVALID_TEMPLATE")
                    }
                    TemplateError::SubstitutionFailed(_) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "SUBSTITUTION_FAILED")
                    }
                    TemplateError::Backend(_) => (StatusCode::BAD_GATEWAY, "BACKEND_ERROR"),
                };
                ErrorParts {
                    status,
                    code,
                    client_message: e.to_string(),
                    fields: None,
                }
            }
            AppError::Export(e) => internal("EXPORT_ERROR", e.to_string(), messages::UNEXPECTED_ERROR),
            AppError::Internal(e) => {
                internal("INTERNAL_ERROR", e.clone(), "Internal server error")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let parts = self.parts();

        // Always log the detailed error server-side
        tracing::error!(
            code = %parts.code,
            status = %parts.status.as_u16(),
            message = %self,
            "API error"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: parts.code.to_string(),
                message: parts.client_message,
                fields: parts.fields,
            },
        };

        (parts.status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_validation_maps_to_422_with_fields() {
        let mut errors = BTreeMap::new();
        errors.insert("email".to_string(), vec!["taken".to_string()]);
        let err = AppError::Backend(ClientError::Validation {
            message: "The given data was invalid.".to_string(),
            errors,
        });

        let parts = err.parts();
        assert_eq!(parts.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(parts.fields.is_some());
    }

    #[test]
    fn test_business_rejection_keeps_client_status() {
        let err = AppError::Backend(ClientError::Rejected {
            status: 409,
            message: "Cannot delete user with assigned applications".to_string(),
        });

        let parts = err.parts();
        assert_eq!(parts.status, StatusCode::CONFLICT);
        assert_eq!(parts.code, "BACKEND_REJECTED");
    }

    #[test]
    fn test_backend_outage_is_bad_gateway() {
        let err = AppError::Backend(ClientError::Transport("refused".to_string()));
        let parts = err.parts();
        assert_eq!(parts.status, StatusCode::BAD_GATEWAY);
        assert_eq!(parts.client_message, messages::NETWORK_ERROR);
    }

    #[test]
    fn test_template_not_found() {
        let err = AppError::Template(TemplateError::NotFound(7));
        assert_eq!(err.parts().status, StatusCode::NOT_FOUND);
    }
}
