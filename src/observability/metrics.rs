//! Metrics collection and exposition.
//!
//! # Metrics
//! - `validator_records_total` (counter): validations by outcome
//!   (`valid`, `invalid`, `fault`)
//! - `validator_issues_total` (counter): issues reported across all records
//! - `books_service_operations_total` (counter): service calls by
//!   operation and status code
//!
//! # Design Decisions
//! - Low-overhead metric updates; a no-op until a recorder is installed
//! - Exposition is rendered on demand by the binary, no listener

use metrics::counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use crate::validation::ValidationReport;

/// Install the Prometheus recorder as the global recorder.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record a completed validation.
pub fn record_validation(report: &ValidationReport) {
    let outcome = if report.is_valid() { "valid" } else { "invalid" };
    counter!("validator_records_total", "outcome" => outcome).increment(1);
    if !report.is_valid() {
        counter!("validator_issues_total").increment(report.len() as u64);
    }
}

/// Record a validation refused because of caller misuse.
pub fn record_usage_fault() {
    counter!("validator_records_total", "outcome" => "fault").increment(1);
}

/// Record a service operation and its status code.
pub fn record_operation(op: &'static str, status: u16) {
    counter!(
        "books_service_operations_total",
        "op" => op,
        "status" => status.to_string()
    )
    .increment(1);
}
