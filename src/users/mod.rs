//! Console staff users: model and form validation.

pub mod types;
pub mod validation;

pub use types::{AdminUser, FormMode, UserForm, UserRole};
pub use validation::{password_strength, validate_user_form, PasswordStrength, MIN_PASSWORD_SCORE};
