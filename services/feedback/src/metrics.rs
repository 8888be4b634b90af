//! Prometheus metrics for the feedback service
//!
//! Counters are recorded through the `metrics` facade; without an installed
//! recorder (unit tests, `metrics_enabled = false`) every call is a no-op.

use anyhow::Result;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::aggregator::Stats;

pub const SUBMISSIONS_TOTAL: &str = "feedback_submissions_total";
pub const SUBMISSIONS_REJECTED_TOTAL: &str = "feedback_submissions_rejected_total";
pub const STATS_REQUESTS_TOTAL: &str = "feedback_stats_requests_total";
pub const WINDOW_RECORDS: &str = "feedback_window_records";

/// Install the global Prometheus recorder and register descriptions
pub fn install_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics();
    Ok(handle)
}

fn register_metrics() {
    describe_counter!(SUBMISSIONS_TOTAL, "Total accepted feedback submissions");
    describe_counter!(
        SUBMISSIONS_REJECTED_TOTAL,
        "Total rejected feedback submissions by reason"
    );
    describe_counter!(STATS_REQUESTS_TOTAL, "Total stats requests served");
    describe_gauge!(WINDOW_RECORDS, "Records currently held in the window");
}

#[allow(clippy::cast_precision_loss)]
pub fn record_submission(window_len: usize) {
    counter!(SUBMISSIONS_TOTAL).increment(1);
    gauge!(WINDOW_RECORDS).set(window_len as f64);
}

pub fn record_rejection(reason: &'static str) {
    counter!(SUBMISSIONS_REJECTED_TOTAL, "reason" => reason).increment(1);
}

#[allow(clippy::cast_precision_loss)]
pub fn record_stats(stats: &Stats) {
    counter!(STATS_REQUESTS_TOTAL).increment(1);
    gauge!(WINDOW_RECORDS).set(stats.records_count as f64);
}
