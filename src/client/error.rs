//! Errors raised while talking to the lending backend.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::error::messages;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, TLS, timeout, refused)
    #[error("Transport error: {0}")]
    Transport(String),

    /// 422-style payload: `{message, errors: {field: [msg]}}`
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        errors: BTreeMap<String, Vec<String>>,
    },

    /// Business-rule rejection or any other non-success status
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid backend configuration: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl ClientError {
    /// HTTP status reported by the backend, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Validation { .. } => Some(422),
            ClientError::Rejected { status, .. } => Some(*status),
            ClientError::NotFound(_) => Some(404),
            ClientError::Unauthorized(_) => Some(401),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            ClientError::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Message suitable for showing to console staff.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(_) => messages::NETWORK_ERROR.to_string(),
            ClientError::Validation { message, errors } => errors
                .values()
                .flatten()
                .next()
                .map(|first| messages::translate(first))
                .or_else(|| messages::known(message).map(str::to_string))
                .unwrap_or_else(|| messages::VALIDATION_ERROR.to_string()),
            ClientError::Rejected { status, message } => messages::known(message)
                .map(str::to_string)
                .unwrap_or_else(|| messages::for_status(*status).to_string()),
            ClientError::NotFound(_) => messages::NOT_FOUND.to_string(),
            ClientError::Unauthorized(_) => messages::SESSION_EXPIRED.to_string(),
            ClientError::Decode(_) | ClientError::Config(_) => {
                messages::UNEXPECTED_ERROR.to_string()
            }
        }
    }
}
