//! Spanish display messages.
//!
//! Every error shown to console staff goes through this dictionary. Backend
//! messages that are known get a fixed translation; anything else falls back to
//! a generic message chosen by HTTP status.

pub const NETWORK_ERROR: &str =
    "No se pudo conectar con el servidor. Verifica tu conexión e intenta de nuevo.";
pub const VALIDATION_ERROR: &str = "Los datos enviados no son válidos. Revisa el formulario.";
pub const NOT_FOUND: &str = "El recurso solicitado no existe o fue eliminado.";
pub const SESSION_EXPIRED: &str = "Tu sesión expiró. Inicia sesión nuevamente.";
pub const FORBIDDEN: &str = "No tienes permisos para realizar esta acción.";
pub const CONFLICT: &str = "La operación entra en conflicto con el estado actual del registro.";
pub const TOO_MANY_REQUESTS: &str = "Demasiadas solicitudes. Espera un momento e intenta de nuevo.";
pub const SERVER_ERROR: &str = "Ocurrió un error en el servidor. Intenta más tarde.";
pub const UNEXPECTED_ERROR: &str = "Ocurrió un error inesperado.";

/// Known backend messages, compared case-insensitively without trailing period.
const KNOWN_MESSAGES: &[(&str, &str)] = &[
    (
        "cannot delete user with assigned applications",
        "No se puede eliminar un usuario con solicitudes asignadas.",
    ),
    (
        "cannot delete your own account",
        "No puedes eliminar tu propia cuenta.",
    ),
    (
        "application already assigned",
        "La solicitud ya está asignada a otro analista.",
    ),
    (
        "application cannot be rejected in its current status",
        "La solicitud no puede rechazarse en su estatus actual.",
    ),
    (
        "assignee is not active",
        "El analista seleccionado está inactivo.",
    ),
    (
        "the email has already been taken",
        "El correo electrónico ya está registrado.",
    ),
    (
        "the phone has already been taken",
        "El teléfono ya está registrado.",
    ),
    (
        "the slug has already been taken",
        "El identificador del tenant ya está en uso.",
    ),
    (
        "the given data was invalid",
        VALIDATION_ERROR,
    ),
    (
        "unauthenticated",
        SESSION_EXPIRED,
    ),
    (
        "this action is unauthorized",
        FORBIDDEN,
    ),
    (
        "provider credentials are invalid",
        "Las credenciales del proveedor no son válidas.",
    ),
    (
        "template not found",
        "La plantilla no existe o fue eliminada.",
    ),
];

fn normalize(message: &str) -> String {
    message.trim().trim_end_matches('.').to_lowercase()
}

/// Fixed translation for a known backend message.
pub fn known(message: &str) -> Option<&'static str> {
    let normalized = normalize(message);
    KNOWN_MESSAGES
        .iter()
        .find(|(key, _)| *key == normalized)
        .map(|(_, translated)| *translated)
}

/// Translation when known, otherwise the message as sent by the backend.
pub fn translate(message: &str) -> String {
    known(message)
        .map(str::to_string)
        .unwrap_or_else(|| message.trim().to_string())
}

/// Generic message for an HTTP status.
pub fn for_status(status: u16) -> &'static str {
    match status {
        401 => SESSION_EXPIRED,
        403 => FORBIDDEN,
        404 => NOT_FOUND,
        409 => CONFLICT,
        422 => VALIDATION_ERROR,
        429 => TOO_MANY_REQUESTS,
        500..=599 => SERVER_ERROR,
        _ => UNEXPECTED_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_is_case_and_period_insensitive() {
        assert_eq!(
            known("  The email has already been taken. "),
            Some("El correo electrónico ya está registrado.")
        );
        assert_eq!(known("something else"), None);
    }

    #[test]
    fn test_translate_passes_unknown_through() {
        assert_eq!(translate("El folio no existe"), "El folio no existe");
        assert_eq!(translate("Unauthenticated."), SESSION_EXPIRED);
    }

    #[test]
    fn test_for_status() {
        assert_eq!(for_status(403), FORBIDDEN);
        assert_eq!(for_status(503), SERVER_ERROR);
        assert_eq!(for_status(418), UNEXPECTED_ERROR);
    }
}
