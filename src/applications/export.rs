//! CSV export of application lists.
//!
//! Output is UTF-8 with a byte-order mark so spreadsheet tools detect the
//! encoding, followed by RFC 4180 records (CRLF line ends, fields quoted only
//! when they contain a delimiter, quote or line break).

use chrono::NaiveDate;
use thiserror::Error;

use crate::metrics::EXPORTS_TOTAL;

use super::types::Application;

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const CSV_HEADERS: [&str; 10] = [
    "Folio",
    "Solicitante",
    "Correo",
    "Teléfono",
    "Producto",
    "Monto solicitado",
    "Plazo (meses)",
    "Estatus",
    "Asignado a",
    "Fecha de solicitud",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn record(application: &Application) -> [String; 10] {
    [
        application.folio.clone(),
        application.applicant.full_name(),
        application.applicant.email.clone(),
        application.applicant.phone.clone().unwrap_or_default(),
        application.product_name.clone(),
        format!("{:.2}", application.requested_amount),
        application.term_months.to_string(),
        application.status.label().to_string(),
        application
            .assigned_to
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_default(),
        application.created_at.format("%Y-%m-%d %H:%M").to_string(),
    ]
}

/// Header row plus one row per application.
pub fn export_csv(applications: &[Application]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record(CSV_HEADERS)?;
    for application in applications {
        writer.write_record(record(application))?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    EXPORTS_TOTAL.inc();
    tracing::info!(rows = applications.len(), bytes = bytes.len(), "Applications exported");

    Ok(bytes)
}

/// `solicitudes_YYYY-MM-DD.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("solicitudes_{}.csv", date.format("%Y-%m-%d"))
}
