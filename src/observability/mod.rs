//! Observability subsystem.
//!
//! # Responsibilities
//! - Structured logging setup (logging.rs)
//! - Metric definitions and recording helpers (metrics.rs)
//! - Prometheus scrape endpoint (exporter.rs)
//!
//! # Metrics
//! - `login_attempts_total` (counter): probe attempts by outcome status
//! - `login_duration_seconds` (histogram): probe latency distribution
//! - `service_up` (gauge): 1=up, 0=down, tracks the most recent probe only

pub mod exporter;
pub mod logging;
pub mod metrics;

pub use exporter::MetricsServer;
