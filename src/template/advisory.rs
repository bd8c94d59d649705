//! Non-blocking shape checks for templates.

use serde::Serialize;

use super::interpolation::placeholders;
use super::preview::render_preview;
use super::types::{TemplateConfig, TemplateContent};

/// A warning about a template's shape. Never blocks a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// The channel expects a subject and none is set
    MissingSubject,
    /// The channel cannot deliver HTML but an HTML body is set
    HtmlNotSupported,
    /// Rendered body is longer than the channel allows
    OverCharacterLimit { limit: usize, length: usize },
    /// The event is not part of the template config
    UnknownEvent { event: String },
    /// Placeholders the event does not provide
    UnknownVariables { keys: Vec<String> },
}

impl Advisory {
    pub fn message(&self) -> String {
        match self {
            Advisory::MissingSubject => "Este canal requiere un asunto.".to_string(),
            Advisory::HtmlNotSupported => {
                "Este canal no admite contenido HTML; se enviará solo el texto.".to_string()
            }
            Advisory::OverCharacterLimit { limit, length } => format!(
                "El mensaje tiene {} caracteres y el límite del canal es {}.",
                length, limit
            ),
            Advisory::UnknownEvent { event } => format!("El evento '{}' no existe.", event),
            Advisory::UnknownVariables { keys } => format!(
                "Variables no disponibles para este evento: {}",
                keys.join(", ")
            ),
        }
    }
}

/// Advisories for `template` against `config`.
///
/// Length is measured in characters after sample values are filled in.
/// Unknown placeholders are only reported for events present in the config.
pub fn advisories<T: TemplateContent>(template: &T, config: &TemplateConfig) -> Vec<Advisory> {
    let mut found = Vec::new();
    let channel = config.channel(template.channel());

    let has_subject = template.subject().is_some_and(|s| !s.trim().is_empty());
    if channel.requires_subject && !has_subject {
        found.push(Advisory::MissingSubject);
    }

    let has_html = template.html_body().is_some_and(|h| !h.trim().is_empty());
    if !channel.supports_html && has_html {
        found.push(Advisory::HtmlNotSupported);
    }

    if let Some(limit) = channel.character_limit {
        let length = render_preview(template.body()).chars().count();
        if length > limit {
            found.push(Advisory::OverCharacterLimit { limit, length });
        }
    }

    match config.event(template.event()) {
        Some(event) => {
            let mut keys = Vec::new();
            let parts = [template.subject(), Some(template.body()), template.html_body()];
            for part in parts.into_iter().flatten() {
                for key in placeholders(part) {
                    if !event.available_variables.contains(&key) && !keys.contains(&key) {
                        keys.push(key);
                    }
                }
            }
            if !keys.is_empty() {
                found.push(Advisory::UnknownVariables { keys });
            }
        }
        None if !config.events.is_empty() => found.push(Advisory::UnknownEvent {
            event: template.event().to_string(),
        }),
        None => {}
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::catalog::default_config;
    use crate::template::types::{Channel, CreateTemplateRequest};

    fn template(channel: Channel) -> CreateTemplateRequest {
        CreateTemplateRequest {
            name: "t".to_string(),
            event: "otp_verification".to_string(),
            channel,
            is_active: true,
            priority: 5,
            subject: None,
            body: "Tu código es {{otp.code}}".to_string(),
            html_body: None,
        }
    }

    #[test]
    fn test_clean_sms_has_no_advisories() {
        assert!(advisories(&template(Channel::Sms), &default_config()).is_empty());
    }

    #[test]
    fn test_missing_subject() {
        let found = advisories(&template(Channel::Email), &default_config());
        assert_eq!(found, vec![Advisory::MissingSubject]);
    }

    #[test]
    fn test_html_on_sms() {
        let mut t = template(Channel::Sms);
        t.html_body = Some("<p>x</p>".to_string());
        assert_eq!(advisories(&t, &default_config()), vec![Advisory::HtmlNotSupported]);
    }

    #[test]
    fn test_over_limit_counts_rendered_characters() {
        let mut t = template(Channel::Sms);
        t.body = "ñ".repeat(155) + "{{otp.code}}";
        let found = advisories(&t, &default_config());
        assert_eq!(
            found,
            vec![Advisory::OverCharacterLimit { limit: 160, length: 161 }]
        );
    }

    #[test]
    fn test_unknown_variables_and_events() {
        let config = default_config();

        let mut t = template(Channel::Sms);
        t.body = "{{otp.code}} {{application.folio}} {{foo}}".to_string();
        assert_eq!(
            advisories(&t, &config),
            vec![Advisory::UnknownVariables {
                keys: vec!["application.folio".to_string(), "foo".to_string()]
            }]
        );

        t.event = "nope".to_string();
        t.body = "hola".to_string();
        assert_eq!(
            advisories(&t, &config),
            vec![Advisory::UnknownEvent { event: "nope".to_string() }]
        );
    }

    #[test]
    fn test_advisory_serialization() {
        let value = serde_json::to_value(Advisory::OverCharacterLimit { limit: 160, length: 170 }).unwrap();
        assert_eq!(value["kind"], "over_character_limit");
        assert!(Advisory::MissingSubject.message().contains("asunto"));
    }
}
