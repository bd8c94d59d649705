//! Staff user form rules.

use serde::Serialize;

use crate::validation::{is_valid_email, is_valid_phone, FormErrors};

use super::types::{FormMode, UserForm};

/// Lowest strength score accepted for a new password.
pub const MIN_PASSWORD_SCORE: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    /// 0 to 5, one point per rule met
    pub score: u8,
    pub label: &'static str,
}

impl PasswordStrength {
    pub fn is_acceptable(&self) -> bool {
        self.score >= MIN_PASSWORD_SCORE
    }
}

/// Score a password: length >= 8, length >= 12, mixed case, a digit, a symbol.
pub fn password_strength(password: &str) -> PasswordStrength {
    let length = password.chars().count();
    let rules = [
        length >= 8,
        length >= 12,
        password.chars().any(char::is_lowercase) && password.chars().any(char::is_uppercase),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
    ];
    let score = rules.iter().filter(|met| **met).count() as u8;

    let label = match score {
        0 | 1 => "Muy débil",
        2 => "Débil",
        3 => "Aceptable",
        4 => "Fuerte",
        _ => "Muy fuerte",
    };
    PasswordStrength { score, label }
}

/// Validate the create/edit form. On edit a blank password means "unchanged".
pub fn validate_user_form(form: &UserForm, mode: FormMode) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();

    errors.require("name", &form.name, "El nombre es obligatorio.");
    if errors.require("email", &form.email, "El correo electrónico es obligatorio.")
        && !is_valid_email(&form.email)
    {
        errors.add("email", "El correo electrónico no es válido.");
    }

    if let Some(phone) = form.phone.as_deref().filter(|p| !p.trim().is_empty()) {
        if !is_valid_phone(phone) {
            errors.add("phone", "El teléfono debe tener 10 dígitos.");
        }
    }

    let password = form.password.as_deref().unwrap_or("");
    if password.is_empty() {
        if mode == FormMode::Create {
            errors.add("password", "La contraseña es obligatoria.");
        }
    } else {
        if !password_strength(password).is_acceptable() {
            errors.add(
                "password",
                "La contraseña es demasiado débil. Usa al menos 8 caracteres con mayúsculas, números o símbolos.",
            );
        }
        if form.password_confirmation.as_deref() != Some(password) {
            errors.add("password_confirmation", "Las contraseñas no coinciden.");
        }
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::UserRole;

    fn form() -> UserForm {
        UserForm {
            name: "Ana Torres".to_string(),
            email: "ana.torres@financiera.mx".to_string(),
            phone: Some("+52 55 1234 5678".to_string()),
            role: UserRole::Analyst,
            is_active: true,
            password: Some("Prestamo2024".to_string()),
            password_confirmation: Some("Prestamo2024".to_string()),
        }
    }

    #[test]
    fn test_strength_scores() {
        assert_eq!(password_strength("").score, 0);
        assert_eq!(password_strength("abc").label, "Muy débil");
        assert_eq!(password_strength("abcdefgh").score, 1);
        assert_eq!(password_strength("abcdefgh1").label, "Débil");
        assert_eq!(password_strength("Abcdefgh1").label, "Aceptable");
        assert_eq!(password_strength("Abcdefgh1!").label, "Fuerte");
        assert_eq!(password_strength("Abcdefgh1!xyz").score, 5);
        assert_eq!(password_strength("Abcdefgh1!xyz").label, "Muy fuerte");
    }

    #[test]
    fn test_valid_form() {
        assert!(validate_user_form(&form(), FormMode::Create).is_ok());
    }

    #[test]
    fn test_required_fields_and_formats() {
        let mut f = form();
        f.name = "  ".to_string();
        f.email = "ana@financiera".to_string();
        f.phone = Some("12345".to_string());

        let errors = validate_user_form(&f, FormMode::Create).unwrap_err();
        assert!(errors.has("name"));
        assert!(errors.has("email"));
        assert!(errors.has("phone"));
        assert!(!errors.has("password"));
    }

    #[test]
    fn test_password_rules_by_mode() {
        let mut f = form();
        f.password = None;
        f.password_confirmation = None;

        let errors = validate_user_form(&f, FormMode::Create).unwrap_err();
        assert!(errors.has("password"));
        assert!(validate_user_form(&f, FormMode::Edit).is_ok());

        f.password = Some("abcdefgh".to_string());
        f.password_confirmation = Some("abcdefgh".to_string());
        let errors = validate_user_form(&f, FormMode::Edit).unwrap_err();
        assert!(errors.has("password"));

        f.password = Some("Prestamo2024".to_string());
        f.password_confirmation = Some("Prestamo2025".to_string());
        let errors = validate_user_form(&f, FormMode::Create).unwrap_err();
        assert_eq!(errors.fields.keys().collect::<Vec<_>>(), vec!["password_confirmation"]);
    }
}
