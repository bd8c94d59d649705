//! Prometheus metrics for the admin console service.
//!
//! - Backend client metrics (requests by operation/outcome, latency)
//! - Template cache and provisioning metrics
//! - Bulk operation outcomes
//! - CSV exports

mod helpers;

pub use helpers::{encode_metrics, BackendMetrics, BulkMetrics, ProvisionMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, register_int_gauge,
    HistogramVec, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "console";

lazy_static! {
    // ============================================================================
    // Backend Client Metrics
    // ============================================================================

    /// Backend requests by operation and outcome
    pub static ref BACKEND_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_backend_requests_total", METRIC_PREFIX),
        "Total requests sent to the lending backend",
        &["backend", "operation", "outcome"]
    ).unwrap();

    /// Backend request latency
    pub static ref BACKEND_REQUEST_LATENCY: HistogramVec = register_histogram_vec!(
        format!("{}_backend_request_latency_seconds", METRIC_PREFIX),
        "Lending backend request latency in seconds",
        &["backend", "operation"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    ).unwrap();

    /// List responses dropped because a newer request was issued
    pub static ref STALE_RESPONSES_DISCARDED: IntCounter = register_int_counter!(
        format!("{}_stale_responses_discarded_total", METRIC_PREFIX),
        "List responses discarded because a newer request was issued"
    ).unwrap();

    // ============================================================================
    // Template Metrics
    // ============================================================================

    /// Templates currently held in the cache
    pub static ref TEMPLATE_CACHE_SIZE: IntGauge = register_int_gauge!(
        format!("{}_template_cache_size", METRIC_PREFIX),
        "Number of notification templates in the local cache"
    ).unwrap();

    /// Provisioning runs by mode and result
    pub static ref PROVISION_RUNS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_provision_runs_total", METRIC_PREFIX),
        "Suggested-template provisioning runs",
        &["mode", "result"]
    ).unwrap();

    /// Templates created or deleted while provisioning
    pub static ref PROVISION_TEMPLATES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_provision_templates_total", METRIC_PREFIX),
        "Templates touched by provisioning",
        &["action"]
    ).unwrap();

    // ============================================================================
    // Bulk Operation Metrics
    // ============================================================================

    /// Items processed by bulk operations
    pub static ref BULK_ITEMS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_bulk_items_total", METRIC_PREFIX),
        "Items processed by bulk operations",
        &["action", "outcome"]
    ).unwrap();

    /// CSV exports generated
    pub static ref EXPORTS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_exports_total", METRIC_PREFIX),
        "CSV exports generated"
    ).unwrap();
}
