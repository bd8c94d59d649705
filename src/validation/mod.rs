//! Form validation shared by the user, branding and API-config forms.
//!
//! Errors are collected per field in the same `{field: [messages]}` shape the
//! backend uses for its 422 responses, so both sources render identically.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern");
    // Optional +country prefix, then 10 national digits; spaces and dashes allowed
    static ref PHONE_RE: Regex =
        Regex::new(r"^(\+\d{1,3}[\s-]?)?(\d[\s-]?){9}\d$").expect("valid phone pattern");
    static ref HEX_COLOR_RE: Regex =
        Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid color pattern");
}

/// Field-keyed validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("{} field(s) failed validation", .fields.len())]
pub struct FormErrors {
    pub fields: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Record `message` when `value` is blank. Returns true when the value was present.
    pub fn require(&mut self, field: &str, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, message);
            false
        } else {
            true
        }
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Ok when nothing was recorded, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone.trim())
}

pub fn is_valid_hex_color(color: &str) -> bool {
    HEX_COLOR_RE.is_match(color.trim())
}

/// Absolute `https` URL with a host.
pub fn is_valid_https_url(input: &str) -> bool {
    match reqwest::Url::parse(input.trim()) {
        Ok(url) => url.scheme() == "https" && url.host_str().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_rule() {
        assert!(is_valid_email("ana.torres@financiera.mx"));
        assert!(is_valid_email("  a@b.co "));
        assert!(!is_valid_email("ana.torres@financiera"));
        assert!(!is_valid_email("ana torres@financiera.mx"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_phone_rule() {
        assert!(is_valid_phone("5512345678"));
        assert!(is_valid_phone("+52 55 1234 5678"));
        assert!(is_valid_phone("55-1234-5678"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("55123456789012"));
        assert!(!is_valid_phone("55abc45678"));
    }

    #[test]
    fn test_hex_color_and_url_rules() {
        assert!(is_valid_hex_color("#1D4ED8"));
        assert!(!is_valid_hex_color("1D4ED8"));
        assert!(!is_valid_hex_color("#1D4"));

        assert!(is_valid_https_url("https://cdn.example.com/logo.png"));
        assert!(!is_valid_https_url("http://cdn.example.com/logo.png"));
        assert!(!is_valid_https_url("not a url"));
    }

    #[test]
    fn test_form_errors_collects_per_field() {
        let mut errors = FormErrors::new();
        assert!(!errors.require("name", "   ", "El nombre es obligatorio"));
        assert!(errors.require("email", "a@b.co", "El correo es obligatorio"));
        errors.add("name", "Otro error");

        assert!(errors.has("name"));
        assert!(!errors.has("email"));
        assert_eq!(errors.fields["name"].len(), 2);
        assert!(errors.into_result().is_err());
        assert!(FormErrors::new().into_result().is_ok());
    }
}
