//! Template data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::ClientError;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(u64),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Variable substitution failed: {0}")]
    SubstitutionFailed(String),

    #[error(transparent)]
    Backend(#[from] ClientError),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Delivery channel of a notification template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Email,
    Sms,
    Whatsapp,
    InApp,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Email, Channel::Sms, Channel::Whatsapp, Channel::InApp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "EMAIL",
            Channel::Sms => "SMS",
            Channel::Whatsapp => "WHATSAPP",
            Channel::InApp => "IN_APP",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Channel::Email => "Correo electrónico",
            Channel::Sms => "SMS",
            Channel::Whatsapp => "WhatsApp",
            Channel::InApp => "Notificación en la app",
        }
    }

    /// Built-in channel metadata, used when the backend config omits a channel.
    pub fn default_option(&self) -> ChannelOption {
        let (requires_subject, supports_html, character_limit) = match self {
            Channel::Email => (true, true, None),
            Channel::Sms => (false, false, Some(160)),
            Channel::Whatsapp => (false, false, Some(1024)),
            Channel::InApp => (true, false, Some(500)),
        };
        ChannelOption {
            value: *self,
            label: self.label().to_string(),
            requires_subject,
            supports_html,
            character_limit,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TemplateError::InvalidTemplate(format!("Unknown channel: {}", s)))
    }
}

fn default_active() -> bool {
    true
}

fn default_priority() -> u8 {
    5
}

/// A notification template as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationTemplate {
    pub id: u64,

    pub name: String,

    /// Event value from the template config (e.g. `application_approved`)
    pub event: String,

    pub channel: Channel,

    #[serde(default = "default_active")]
    pub is_active: bool,

    /// 1 (lowest) to 10 (highest)
    #[serde(default = "default_priority")]
    pub priority: u8,

    #[serde(default)]
    pub subject: Option<String>,

    pub body: String,

    #[serde(default)]
    pub html_body: Option<String>,

    #[serde(default)]
    pub created_by: Option<String>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request to create a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub event: String,
    pub channel: Channel,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub subject: Option<String>,
    pub body: String,
    #[serde(default)]
    pub html_body: Option<String>,
}

impl CreateTemplateRequest {
    /// Required fields and priority range. Channel shape rules are advisory only.
    pub fn validate(&self) -> TemplateResult<()> {
        if self.name.trim().is_empty() || self.name.len() > 255 {
            return Err(TemplateError::InvalidTemplate(
                "Name must be 1-255 characters".to_string(),
            ));
        }

        if self.event.trim().is_empty() {
            return Err(TemplateError::InvalidTemplate(
                "Event is required".to_string(),
            ));
        }

        if self.body.trim().is_empty() {
            return Err(TemplateError::InvalidTemplate(
                "Body is required".to_string(),
            ));
        }

        validate_priority(self.priority)
    }
}

fn validate_priority(priority: u8) -> TemplateResult<()> {
    if (1..=10).contains(&priority) {
        Ok(())
    } else {
        Err(TemplateError::InvalidTemplate(format!(
            "Priority must be between 1 and 10, got {}",
            priority
        )))
    }
}

/// Partial update; `Some(None)` clears a nullable field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTemplateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_body: Option<Option<String>>,
}

impl UpdateTemplateRequest {
    pub fn toggle(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> TemplateResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(TemplateError::InvalidTemplate(
                    "Name cannot be empty".to_string(),
                ));
            }
        }
        if let Some(body) = &self.body {
            if body.trim().is_empty() {
                return Err(TemplateError::InvalidTemplate(
                    "Body cannot be empty".to_string(),
                ));
            }
        }
        match self.priority {
            Some(priority) => validate_priority(priority),
            None => Ok(()),
        }
    }

    /// Apply onto a stored template (used by the in-memory backend).
    pub fn apply_to(&self, template: &mut NotificationTemplate) {
        if let Some(name) = &self.name {
            template.name = name.clone();
        }
        if let Some(event) = &self.event {
            template.event = event.clone();
        }
        if let Some(channel) = self.channel {
            template.channel = channel;
        }
        if let Some(is_active) = self.is_active {
            template.is_active = is_active;
        }
        if let Some(priority) = self.priority {
            template.priority = priority;
        }
        if let Some(subject) = &self.subject {
            template.subject = subject.clone();
        }
        if let Some(body) = &self.body {
            template.body = body.clone();
        }
        if let Some(html_body) = &self.html_body {
            template.html_body = html_body.clone();
        }
        template.updated_at = Some(Utc::now());
    }
}

/// An event that can trigger notifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOption {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub recommended_channels: Vec<Channel>,
    #[serde(default)]
    pub available_variables: Vec<String>,
}

/// Channel capabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelOption {
    pub value: Channel,
    pub label: String,
    #[serde(default)]
    pub requires_subject: bool,
    #[serde(default)]
    pub supports_html: bool,
    #[serde(default)]
    pub character_limit: Option<usize>,
}

/// Static reference data owned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default)]
    pub events: Vec<EventOption>,
    #[serde(default)]
    pub channels: Vec<ChannelOption>,
}

impl TemplateConfig {
    pub fn event(&self, value: &str) -> Option<&EventOption> {
        self.events.iter().find(|e| e.value == value)
    }

    /// Channel metadata from the config, falling back to built-in defaults.
    pub fn channel(&self, channel: Channel) -> ChannelOption {
        self.channels
            .iter()
            .find(|c| c.value == channel)
            .cloned()
            .unwrap_or_else(|| channel.default_option())
    }

    pub fn event_label<'a>(&'a self, value: &'a str) -> &'a str {
        self.event(value).map(|e| e.label.as_str()).unwrap_or(value)
    }
}

/// Read access to the fields every template shape shares.
pub trait TemplateContent {
    fn event(&self) -> &str;
    fn channel(&self) -> Channel;
    fn subject(&self) -> Option<&str>;
    fn body(&self) -> &str;
    fn html_body(&self) -> Option<&str>;
}

impl TemplateContent for NotificationTemplate {
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

impl TemplateContent for CreateTemplateRequest {
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> CreateTemplateRequest {
        CreateTemplateRequest {
            name: "Solicitud aprobada".to_string(),
            event: "application_approved".to_string(),
            channel: Channel::Sms,
            is_active: true,
            priority: 8,
            subject: None,
            body: "Tu solicitud {{application.folio}} fue aprobada".to_string(),
            html_body: None,
        }
    }

    #[test]
    fn test_channel_wire_format() {
        assert_eq!(serde_json::to_value(Channel::InApp).unwrap(), json!("IN_APP"));
        let parsed: Channel = serde_json::from_value(json!("WHATSAPP")).unwrap();
        assert_eq!(parsed, Channel::Whatsapp);
        assert_eq!("email".parse::<Channel>().unwrap(), Channel::Email);
        assert!("fax".parse::<Channel>().is_err());
    }

    #[test]
    fn test_template_deserializes_with_defaults() {
        let template: NotificationTemplate = serde_json::from_value(json!({
            "id": 12,
            "name": "OTP",
            "event": "otp_verification",
            "channel": "SMS",
            "body": "Tu código es {{otp.code}}",
            "subject": null
        }))
        .unwrap();

        assert!(template.is_active);
        assert_eq!(template.priority, 5);
        assert!(template.html_body.is_none());
    }

    #[test]
    fn test_create_validation() {
        assert!(request().validate().is_ok());

        let mut bad = request();
        bad.priority = 11;
        assert!(matches!(bad.validate(), Err(TemplateError::InvalidTemplate(_))));

        let mut bad = request();
        bad.body = "  ".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_update_clears_nullable_fields() {
        let update = UpdateTemplateRequest {
            html_body: Some(None),
            ..UpdateTemplateRequest::default()
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, json!({"html_body": null}));

        let mut template = NotificationTemplate {
            id: 1,
            name: "x".to_string(),
            event: "e".to_string(),
            channel: Channel::Email,
            is_active: true,
            priority: 5,
            subject: Some("s".to_string()),
            body: "b".to_string(),
            html_body: Some("<p>b</p>".to_string()),
            created_by: None,
            updated_at: None,
        };
        update.apply_to(&mut template);
        assert!(template.html_body.is_none());
        assert_eq!(template.subject.as_deref(), Some("s"));
    }

    #[test]
    fn test_config_channel_falls_back_to_defaults() {
        let config = TemplateConfig::default();
        let sms = config.channel(Channel::Sms);
        assert_eq!(sms.character_limit, Some(160));
        assert!(!sms.supports_html);
        assert!(config.channel(Channel::Email).requires_subject);
    }
}
