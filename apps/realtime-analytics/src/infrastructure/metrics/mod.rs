//! Prometheus Metrics Module
//!
//! Exposes pipeline metrics in Prometheus format.
//!
//! # Metrics Categories
//!
//! - **Messages**: received, applied and skipped (by reason)
//! - **Store**: write conflicts and fatal store errors
//! - **Latency**: full-scan duration on the read path
//!
//! # Integration
//!
//! Metrics are exposed at `/metrics` on the HTTP port. Recording functions
//! are no-ops until [`init_metrics`] installs the recorder.

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

// =============================================================================
// Global Metrics Handle
// =============================================================================

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// # Panics
///
/// Panics if another global recorder is already installed.
#[allow(clippy::expect_used)]
pub fn init_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder");

            register_metrics();
            handle
        })
        .clone()
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

// =============================================================================
// Metric Registration
// =============================================================================

const MESSAGES_RECEIVED: &str = "analytics_messages_received_total";
const MESSAGES_APPLIED: &str = "analytics_messages_applied_total";
const MESSAGES_SKIPPED: &str = "analytics_messages_skipped_total";
const CONFLICTS: &str = "analytics_conflicts_total";
const STORE_ERRORS: &str = "analytics_store_errors_total";
const SCAN_SECONDS: &str = "analytics_scan_seconds";

fn register_metrics() {
    describe_counter!(MESSAGES_RECEIVED, "Total messages received in ingest batches");
    describe_counter!(MESSAGES_APPLIED, "Total messages applied to the record store");
    describe_counter!(
        MESSAGES_SKIPPED,
        "Total messages dropped before reaching the store, by reason"
    );
    describe_counter!(CONFLICTS, "Total updates rejected by a write condition");
    describe_counter!(STORE_ERRORS, "Total fatal record store errors");
    describe_histogram!(SCAN_SECONDS, "Time to scan the full record store");
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Record messages arriving in a batch.
pub fn record_messages_received(count: u64) {
    counter!(MESSAGES_RECEIVED).increment(count);
}

/// Record a message applied to the store.
pub fn record_message_applied() {
    counter!(MESSAGES_APPLIED).increment(1);
}

/// Record a message skipped before reaching the store.
pub fn record_message_skipped(reason: &'static str) {
    counter!(MESSAGES_SKIPPED, "reason" => reason).increment(1);
}

/// Record a write-condition conflict.
pub fn record_conflict() {
    counter!(CONFLICTS).increment(1);
}

/// Record a fatal store error.
pub fn record_store_error() {
    counter!(STORE_ERRORS).increment(1);
}

/// Record full-scan duration.
pub fn record_scan_duration(duration: Duration) {
    histogram!(SCAN_SECONDS).record(duration.as_secs_f64());
}
