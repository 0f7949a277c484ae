//! Metric definitions and recording helpers.
//!
//! All recording helpers are side-effect-only and infallible; before the
//! recorder is installed they fall through to the no-op default, so unit
//! tests can exercise code paths that record metrics without any setup.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

use crate::probe::OutcomeCategory;

pub const LOGIN_ATTEMPTS: &str = "login_attempts_total";
pub const LOGIN_DURATION: &str = "login_duration_seconds";
pub const SERVICE_UP: &str = "service_up";

/// Buckets for the probe latency histogram. The top bucket sits past the
/// default 10 s probe timeout so timeouts land in a finite bucket.
const DURATION_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0];

/// Install the global Prometheus recorder and describe our metrics.
///
/// The returned handle renders the scrape payload; hand it to
/// [`MetricsServer`](crate::observability::exporter::MetricsServer).
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(LOGIN_DURATION.to_string()), DURATION_BUCKETS)?
        .install_recorder()?;

    describe_counter!(LOGIN_ATTEMPTS, "Total login attempts by outcome status");
    describe_histogram!(LOGIN_DURATION, Unit::Seconds, "Login request duration");
    describe_gauge!(SERVICE_UP, "Service status (1=up, 0=down)");

    Ok(handle)
}

/// Count one probe attempt under its outcome category.
pub fn record_attempt(category: OutcomeCategory) {
    counter!(LOGIN_ATTEMPTS, "status" => category.as_str()).increment(1);
}

/// Record one probe duration.
pub fn record_duration(duration: Duration) {
    histogram!(LOGIN_DURATION).record(duration.as_secs_f64());
}

/// Set the binary service-state gauge. Last write wins.
pub fn set_service_up(up: bool) {
    gauge!(SERVICE_UP).set(if up { 1.0 } else { 0.0 });
}
