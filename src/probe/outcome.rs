//! Probe outcome classification.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Maximum bytes of a response body carried into an alert.
pub const MAX_BODY_BYTES: usize = 500;

/// Maximum bytes of a transport error description carried into an alert.
pub const MAX_ERROR_BYTES: usize = 200;

/// Result of a single login probe.
///
/// Constructed once per attempt, then consumed by the metrics registry and
/// (for the failing variants) the notifier. Never persisted.
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    /// The endpoint answered 200.
    Success { duration: Duration },

    /// The endpoint answered with a non-200 status.
    HttpError {
        status: u16,
        /// Response body, truncated to [`MAX_BODY_BYTES`].
        body: String,
        duration: Duration,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    },

    /// The request never produced a response (connect error, timeout, ...).
    TransportError {
        /// Error description, truncated to [`MAX_ERROR_BYTES`].
        message: String,
        duration: Duration,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    },
}

/// Label value for the attempt counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeCategory {
    Success,
    Error,
    Exception,
}

impl OutcomeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeCategory::Success => "success",
            OutcomeCategory::Error => "error",
            OutcomeCategory::Exception => "exception",
        }
    }
}

impl std::fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProbeOutcome {
    pub fn category(&self) -> OutcomeCategory {
        match self {
            ProbeOutcome::Success { .. } => OutcomeCategory::Success,
            ProbeOutcome::HttpError { .. } => OutcomeCategory::Error,
            ProbeOutcome::TransportError { .. } => OutcomeCategory::Exception,
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, ProbeOutcome::Success { .. })
    }

    pub fn duration(&self) -> Duration {
        match self {
            ProbeOutcome::Success { duration }
            | ProbeOutcome::HttpError { duration, .. }
            | ProbeOutcome::TransportError { duration, .. } => *duration,
        }
    }
}

/// Truncate `s` to at most `max` bytes without splitting a UTF-8 character.
pub fn truncate_to_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
