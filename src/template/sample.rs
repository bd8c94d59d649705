//! Sample values used to fill placeholders in previews. Never persisted.

use lazy_static::lazy_static;

use super::interpolation::Variables;

const SAMPLE_VALUES: &[(&str, &str)] = &[
    ("tenant.name", "Financiera Ejemplo"),
    ("tenant.support_email", "soporte@financiera-ejemplo.mx"),
    ("tenant.support_phone", "55 1234 5678"),
    ("tenant.logo_url", "https://cdn.financiera-ejemplo.mx/logo.png"),
    ("tenant.primary_color", "#1D4ED8"),
    ("tenant.portal_url", "https://portal.financiera-ejemplo.mx"),
    ("applicant.first_name", "María"),
    ("applicant.last_name", "González"),
    ("applicant.full_name", "María González"),
    ("applicant.email", "maria.gonzalez@example.com"),
    ("applicant.phone", "+52 55 9876 5432"),
    ("application.folio", "SOL-2024-000123"),
    ("application.amount", "$50,000.00"),
    ("application.term", "12 meses"),
    ("application.product", "Crédito Personal"),
    ("application.status", "En revisión"),
    ("application.monthly_payment", "$4,850.00"),
    ("application.submitted_at", "15/03/2024"),
    ("application.url", "https://portal.financiera-ejemplo.mx/solicitudes/SOL-2024-000123"),
    (
        "application.rejection_reason",
        "No fue posible verificar tus ingresos",
    ),
    (
        "application.corrections",
        "Comprobante de domicilio con antigüedad mayor a 3 meses",
    ),
    (
        "application.pending_documents",
        "INE (reverso), Comprobante de ingresos",
    ),
    ("otp.code", "482915"),
    ("otp.expires_in", "10"),
    ("document.name", "Comprobante de domicilio"),
    ("document.rejection_reason", "La imagen es ilegible"),
    (
        "kyc.failure_reason",
        "La fotografía no coincide con la identificación",
    ),
    ("staff.name", "Carlos Ramírez"),
    ("staff.email", "carlos.ramirez@financiera-ejemplo.mx"),
    ("assignment.assigned_by", "Ana Torres"),
    ("reminder.days_pending", "3"),
];

lazy_static! {
    static ref SAMPLE_VARIABLES: Variables = SAMPLE_VALUES
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
}

/// The fixed sample-data map.
pub fn sample_variables() -> &'static Variables {
    &SAMPLE_VARIABLES
}

/// Sample keys under any of `namespaces` (`"otp"` matches `otp.code`, ...).
pub fn keys_in_namespaces(namespaces: &[&str]) -> Vec<String> {
    SAMPLE_VALUES
        .iter()
        .filter(|(key, _)| {
            key.split_once('.')
                .is_some_and(|(ns, _)| namespaces.contains(&ns))
        })
        .map(|(key, _)| key.to_string())
        .collect()
}
