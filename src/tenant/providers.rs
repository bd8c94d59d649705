//! Third-party provider catalog and API-config form handling.
//!
//! Each `(service_type, provider)` pair has a fixed list of form fields. Secret
//! fields live in `credentials`, everything else in `settings`. Secrets are
//! never echoed back in full: [`mask_secrets`] keeps only the last four
//! characters, and a masked value sent back on update means "unchanged".

use serde::Serialize;

use crate::validation::{is_valid_https_url, FormErrors};

use super::types::{ApiConfig, ApiConfigRequest, ServiceType};

pub const MASK: &str = "••••";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Secret,
    Url,
    Select,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub options: &'static [&'static str],
}

impl FieldSpec {
    const fn new(key: &'static str, label: &'static str, kind: FieldKind, required: bool) -> Self {
        Self {
            key,
            label,
            kind,
            required,
            options: &[],
        }
    }

    const fn select(key: &'static str, label: &'static str, options: &'static [&'static str]) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Select,
            required: true,
            options,
        }
    }

    pub fn is_secret(&self) -> bool {
        self.kind == FieldKind::Secret
    }

    /// Form key as reported in validation errors.
    pub fn error_key(&self) -> String {
        let section = if self.is_secret() { "credentials" } else { "settings" };
        format!("{}.{}", section, self.key)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProviderSpec {
    pub service_type: ServiceType,
    pub provider: &'static str,
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

use FieldKind::{Secret, Text, Url};

const PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        service_type: ServiceType::Sms,
        provider: "twilio",
        name: "Twilio",
        fields: &[
            FieldSpec::new("account_sid", "Account SID", Text, true),
            FieldSpec::new("auth_token", "Auth Token", Secret, true),
            FieldSpec::new("from_number", "Número remitente", Text, true),
        ],
    },
    ProviderSpec {
        service_type: ServiceType::Sms,
        provider: "vonage",
        name: "Vonage",
        fields: &[
            FieldSpec::new("api_key", "API Key", Secret, true),
            FieldSpec::new("api_secret", "API Secret", Secret, true),
            FieldSpec::new("from", "Remitente", Text, true),
        ],
    },
    ProviderSpec {
        service_type: ServiceType::Sms,
        provider: "aws_sns",
        name: "Amazon SNS",
        fields: &[
            FieldSpec::new("access_key_id", "Access Key ID", Secret, true),
            FieldSpec::new("secret_access_key", "Secret Access Key", Secret, true),
            FieldSpec::select("region", "Región", &["us-east-1", "us-east-2", "us-west-2"]),
            FieldSpec::new("sender_id", "Sender ID", Text, false),
        ],
    },
    ProviderSpec {
        service_type: ServiceType::Email,
        provider: "sendgrid",
        name: "SendGrid",
        fields: &[
            FieldSpec::new("api_key", "API Key", Secret, true),
            FieldSpec::new("from_email", "Correo remitente", Text, true),
            FieldSpec::new("from_name", "Nombre remitente", Text, false),
        ],
    },
    ProviderSpec {
        service_type: ServiceType::Email,
        provider: "mailgun",
        name: "Mailgun",
        fields: &[
            FieldSpec::new("api_key", "API Key", Secret, true),
            FieldSpec::new("domain", "Dominio", Text, true),
            FieldSpec::select("region", "Región", &["us", "eu"]),
            FieldSpec::new("from_email", "Correo remitente", Text, true),
        ],
    },
    ProviderSpec {
        service_type: ServiceType::Email,
        provider: "smtp",
        name: "SMTP",
        fields: &[
            FieldSpec::new("host", "Servidor", Text, true),
            FieldSpec::new("port", "Puerto", Text, true),
            FieldSpec::new("username", "Usuario", Text, true),
            FieldSpec::new("password", "Contraseña", Secret, true),
            FieldSpec::select("encryption", "Cifrado", &["tls", "ssl", "none"]),
            FieldSpec::new("from_email", "Correo remitente", Text, true),
        ],
    },
    ProviderSpec {
        service_type: ServiceType::Kyc,
        provider: "metamap",
        name: "MetaMap",
        fields: &[
            FieldSpec::new("client_id", "Client ID", Text, true),
            FieldSpec::new("client_secret", "Client Secret", Secret, true),
            FieldSpec::new("flow_id", "Flow ID", Text, true),
            FieldSpec::new("webhook_url", "URL de webhook", Url, false),
        ],
    },
    ProviderSpec {
        service_type: ServiceType::Kyc,
        provider: "truora",
        name: "Truora",
        fields: &[
            FieldSpec::new("api_key", "API Key", Secret, true),
            FieldSpec::new("flow_id", "Flow ID", Text, true),
            FieldSpec::new("webhook_url", "URL de webhook", Url, false),
        ],
    },
    ProviderSpec {
        service_type: ServiceType::Kyc,
        provider: "incode",
        name: "Incode",
        fields: &[
            FieldSpec::new("api_key", "API Key", Secret, true),
            FieldSpec::new("api_url", "URL de API", Url, true),
            FieldSpec::new("flow_id", "Flow ID", Text, true),
        ],
    },
    ProviderSpec {
        service_type: ServiceType::CreditBureau,
        provider: "buro_de_credito",
        name: "Buró de Crédito",
        fields: &[
            FieldSpec::new("username", "Usuario", Text, true),
            FieldSpec::new("password", "Contraseña", Secret, true),
            FieldSpec::new("member_code", "Clave de otorgante", Text, true),
            FieldSpec::new("api_url", "URL de API", Url, true),
        ],
    },
    ProviderSpec {
        service_type: ServiceType::CreditBureau,
        provider: "circulo_de_credito",
        name: "Círculo de Crédito",
        fields: &[
            FieldSpec::new("api_key", "API Key", Secret, true),
            FieldSpec::new("private_key", "Llave privada", Secret, true),
            FieldSpec::new("folio_otorgante", "Folio otorgante", Text, true),
            FieldSpec::new("api_url", "URL de API", Url, true),
        ],
    },
];

pub fn providers() -> &'static [ProviderSpec] {
    PROVIDERS
}

pub fn providers_for(service_type: ServiceType) -> impl Iterator<Item = &'static ProviderSpec> {
    PROVIDERS.iter().filter(move |p| p.service_type == service_type)
}

pub fn provider(service_type: ServiceType, provider: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS
        .iter()
        .find(|p| p.service_type == service_type && p.provider.eq_ignore_ascii_case(provider.trim()))
}

pub fn provider_fields(service_type: ServiceType, name: &str) -> Option<&'static [FieldSpec]> {
    provider(service_type, name).map(|p| p.fields)
}

pub fn is_masked(value: &str) -> bool {
    value.starts_with(MASK)
}

/// `••••` followed by the last four characters; short values are fully hidden.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return MASK.to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", MASK, tail)
}

/// Copy of `config` with every credential masked.
pub fn mask_secrets(config: &ApiConfig) -> ApiConfig {
    let mut masked = config.clone();
    for value in masked.credentials.values_mut() {
        *value = mask_secret(value);
    }
    masked
}

/// Put the stored value back for every credential that arrives masked or omitted.
///
/// Clients only ever see masked secrets, so an unchanged field comes back as
/// `••••xxxx` and must not reach the backend as the new value.
pub fn restore_masked_secrets(request: &mut ApiConfigRequest, stored: &ApiConfig) {
    for (key, value) in &stored.credentials {
        let keep = request.credentials.get(key).map_or(true, |v| is_masked(v));
        if keep {
            request.credentials.insert(key.clone(), value.clone());
        }
    }
}

/// Check a create/update body against its provider's field list.
pub fn validate_api_config(request: &ApiConfigRequest) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();

    let Some(spec) = provider(request.service_type, &request.provider) else {
        errors.add("provider", "El proveedor no está disponible para este servicio.");
        return errors.into_result();
    };

    for field in spec.fields {
        let section = if field.is_secret() {
            &request.credentials
        } else {
            &request.settings
        };
        let value = section.get(field.key).map(|v| v.trim()).unwrap_or("");

        if value.is_empty() {
            if field.required {
                errors.add(&field.error_key(), format!("{} es obligatorio.", field.label));
            }
            continue;
        }

        match field.kind {
            FieldKind::Url if !is_valid_https_url(value) => {
                errors.add(&field.error_key(), format!("{} debe ser una URL https válida.", field.label));
            }
            FieldKind::Select if !field.options.contains(&value) => {
                errors.add(&field.error_key(), format!("{} no es una opción válida.", field.label));
            }
            _ => {}
        }
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn twilio(credentials: &[(&str, &str)], settings: &[(&str, &str)]) -> ApiConfigRequest {
        ApiConfigRequest {
            service_type: ServiceType::Sms,
            provider: "twilio".to_string(),
            is_active: true,
            is_sandbox: false,
            credentials: map(credentials),
            settings: map(settings),
        }
    }

    #[test]
    fn test_catalog_covers_every_service() {
        for service in ServiceType::ALL {
            assert!(providers_for(service).count() >= 2, "{service}");
        }
        let fields = provider_fields(ServiceType::Email, "SMTP").unwrap();
        assert!(fields.iter().any(|f| f.key == "password" && f.is_secret()));
        assert!(provider_fields(ServiceType::Sms, "sendgrid").is_none());
    }

    #[test]
    fn test_missing_required_fields() {
        let request = twilio(&[], &[("account_sid", "AC123")]);
        let errors = validate_api_config(&request).unwrap_err();
        assert_eq!(
            errors.fields.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["credentials.auth_token", "settings.from_number"]
        );
    }

    #[test]
    fn test_valid_and_masked_update() {
        let request = twilio(
            &[("auth_token", "••••9f3a")],
            &[("account_sid", "AC123"), ("from_number", "+525512345678")],
        );
        assert!(validate_api_config(&request).is_ok());
    }

    #[test]
    fn test_url_and_select_rules() {
        let request = ApiConfigRequest {
            service_type: ServiceType::Email,
            provider: "mailgun".to_string(),
            is_active: true,
            is_sandbox: true,
            credentials: map(&[("api_key", "key-123")]),
            settings: map(&[("domain", "mg.example.com"), ("region", "asia"), ("from_email", "no-reply@example.com")]),
        };
        let errors = validate_api_config(&request).unwrap_err();
        assert!(errors.has("settings.region"));

        let request = ApiConfigRequest {
            service_type: ServiceType::Kyc,
            provider: "incode".to_string(),
            is_active: true,
            is_sandbox: true,
            credentials: map(&[("api_key", "k")]),
            settings: map(&[("api_url", "ftp://incode"), ("flow_id", "f1")]),
        };
        assert!(validate_api_config(&request).unwrap_err().has("settings.api_url"));
    }

    #[test]
    fn test_unknown_provider() {
        let mut request = twilio(&[], &[]);
        request.provider = "telegraph".to_string();
        assert!(validate_api_config(&request).unwrap_err().has("provider"));
    }

    #[test]
    fn test_restore_masked_secrets() {
        let stored = twilio(
            &[("auth_token", "tok_secret_9f3a"), ("signing_key", "sk_old")],
            &[("account_sid", "AC123")],
        )
        .into_config(5, 1);

        let mut request = twilio(&[("auth_token", "••••9f3a")], &[("account_sid", "AC999")]);
        restore_masked_secrets(&mut request, &stored);
        assert_eq!(request.credentials["auth_token"], "tok_secret_9f3a");
        assert_eq!(request.credentials["signing_key"], "sk_old");
        assert_eq!(request.settings["account_sid"], "AC999");

        let mut rotated = twilio(&[("auth_token", "tok_new_0000")], &[]);
        restore_masked_secrets(&mut rotated, &stored);
        assert_eq!(rotated.credentials["auth_token"], "tok_new_0000");
    }

    #[test]
    fn test_masking() {
        assert_eq!(mask_secret("sk_live_abcd1234"), "••••1234");
        assert_eq!(mask_secret("abc"), "••••");
        assert!(is_masked(&mask_secret("whatever-secret")));
        assert!(!is_masked("plain"));

        let config = twilio(&[("auth_token", "tok_secret_9f3a")], &[("account_sid", "AC123")])
            .into_config(1, 1);
        let masked = mask_secrets(&config);
        assert_eq!(masked.credentials["auth_token"], "••••9f3a");
        assert_eq!(masked.settings["account_sid"], "AC123");
    }
}
