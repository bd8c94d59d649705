//! Branding form rules. Every field is optional; present values must be well formed.

use crate::validation::{is_valid_email, is_valid_hex_color, is_valid_https_url, is_valid_phone, FormErrors};

use super::types::Branding;

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn validate_branding(branding: &Branding) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();

    for (field, value) in [
        ("primary_color", &branding.primary_color),
        ("secondary_color", &branding.secondary_color),
    ] {
        if let Some(color) = present(value) {
            if !is_valid_hex_color(color) {
                errors.add(field, "El color debe tener el formato #RRGGBB.");
            }
        }
    }

    if let Some(url) = present(&branding.logo_url) {
        if !is_valid_https_url(url) {
            errors.add("logo_url", "El logotipo debe ser una URL https válida.");
        }
    }
    if let Some(email) = present(&branding.support_email) {
        if !is_valid_email(email) {
            errors.add("support_email", "El correo de soporte no es válido.");
        }
    }
    if let Some(phone) = present(&branding.support_phone) {
        if !is_valid_phone(phone) {
            errors.add("support_phone", "El teléfono de soporte debe tener 10 dígitos.");
        }
    }

    errors.into_result()
}
