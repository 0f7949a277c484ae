//! The login prober.

use std::time::Instant;

use chrono::Utc;
use reqwest::StatusCode;
use serde::Serialize;
use url::Url;

use crate::config::Config;
use crate::probe::outcome::{
    truncate_to_bytes, ProbeOutcome, MAX_BODY_BYTES, MAX_ERROR_BYTES,
};

/// Seam between the monitor loop and the concrete prober, so the loop can be
/// exercised with a scripted probe in tests.
pub trait Probe {
    fn probe(&self) -> impl std::future::Future<Output = ProbeOutcome> + Send;
}

/// Request payload posted to the login endpoint.
#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Posts configured credentials to the target endpoint and classifies the
/// result. Owns its own HTTP client with the per-probe timeout baked in.
pub struct LoginProber {
    client: reqwest::Client,
    url: Url,
    email: String,
    password: String,
}

impl LoginProber {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.probe_timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.login_url.clone(),
            email: config.email.clone(),
            password: config.password.clone(),
        })
    }

    /// Run one probe attempt.
    ///
    /// Infallible by construction: transport errors, timeouts and non-200
    /// statuses all become [`ProbeOutcome`] values instead of escaping to the
    /// caller.
    pub async fn probe(&self) -> ProbeOutcome {
        let started_at = Utc::now();
        let start = Instant::now();

        let payload = LoginRequest {
            email: &self.email,
            password: &self.password,
        };

        let result = self
            .client
            .post(self.url.as_str())
            .json(&payload)
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => {
                let duration = start.elapsed();
                tracing::info!(
                    duration_ms = duration.as_millis() as u64,
                    "login check succeeded"
                );
                ProbeOutcome::Success { duration }
            }
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|e| format!("<failed to read body: {e}>"));
                let duration = start.elapsed();
                let finished_at = Utc::now();
                tracing::warn!(
                    status,
                    duration_ms = duration.as_millis() as u64,
                    "login check failed: unexpected status"
                );
                ProbeOutcome::HttpError {
                    status,
                    body: truncate_to_bytes(&body, MAX_BODY_BYTES).to_string(),
                    duration,
                    started_at,
                    finished_at,
                }
            }
            Err(e) => {
                let duration = start.elapsed();
                let finished_at = Utc::now();
                let message = error_chain(&e);
                tracing::warn!(
                    error = %message,
                    duration_ms = duration.as_millis() as u64,
                    "login check failed: transport error"
                );
                ProbeOutcome::TransportError {
                    message: truncate_to_bytes(&message, MAX_ERROR_BYTES).to_string(),
                    duration,
                    started_at,
                    finished_at,
                }
            }
        }
    }
}

impl Probe for LoginProber {
    fn probe(&self) -> impl std::future::Future<Output = ProbeOutcome> + Send {
        LoginProber::probe(self)
    }
}

/// Render an error with its full source chain.
///
/// reqwest's top-level Display is terse ("error sending request"); the cause
/// chain carries the useful part (connection refused, timed out, DNS).
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Inner;

    impl std::fmt::Display for Inner {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "connection refused")
        }
    }

    impl std::error::Error for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl std::fmt::Display for Outer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "error sending request")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn error_chain_includes_causes() {
        let rendered = error_chain(&Outer(Inner));
        assert_eq!(rendered, "error sending request: connection refused");
    }
}
