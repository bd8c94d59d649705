//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use super::{
    BACKEND_REQUESTS_TOTAL, BACKEND_REQUEST_LATENCY, BULK_ITEMS_TOTAL, PROVISION_RUNS_TOTAL,
    PROVISION_TEMPLATES_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording backend client metrics
pub struct BackendMetrics;

impl BackendMetrics {
    /// Record one backend request with its latency
    pub fn record(backend: &str, operation: &str, success: bool, latency_secs: f64) {
        let outcome = if success { "success" } else { "error" };
        BACKEND_REQUESTS_TOTAL
            .with_label_values(&[backend, operation, outcome])
            .inc();
        BACKEND_REQUEST_LATENCY
            .with_label_values(&[backend, operation])
            .observe(latency_secs);
    }
}

/// Helper struct for recording provisioning metrics
pub struct ProvisionMetrics;

impl ProvisionMetrics {
    pub fn record_created() {
        PROVISION_TEMPLATES_TOTAL.with_label_values(&["created"]).inc();
    }

    pub fn record_deleted() {
        PROVISION_TEMPLATES_TOTAL.with_label_values(&["deleted"]).inc();
    }

    /// Record a finished run
    pub fn record_run(mode: &str, success: bool) {
        let result = if success { "completed" } else { "failed" };
        PROVISION_RUNS_TOTAL.with_label_values(&[mode, result]).inc();
    }
}

/// Helper struct for recording bulk operation metrics
pub struct BulkMetrics;

impl BulkMetrics {
    pub fn record(action: &str, succeeded: usize, failed: usize) {
        BULK_ITEMS_TOTAL
            .with_label_values(&[action, "succeeded"])
            .inc_by(succeeded as u64);
        BULK_ITEMS_TOTAL
            .with_label_values(&[action, "failed"])
            .inc_by(failed as u64);
    }
}
