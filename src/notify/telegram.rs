//! Telegram alert delivery.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::notify::Alert;
use crate::probe::outcome::truncate_to_bytes;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Hard deadline for one sendMessage call.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Bytes of an API error body kept for the log line.
const API_ERROR_SNIPPET: usize = 200;

/// Delivery failure. Logged at the [`Alert::notify`] boundary, never
/// propagated past it.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("telegram request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("telegram api returned {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Sends Markdown messages to one Telegram chat.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_base: TELEGRAM_API_BASE.to_string(),
            token,
            chat_id,
        })
    }

    /// Point the notifier at a different API host. Used by tests to capture
    /// deliveries with a local mock server.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// One delivery attempt. Fallible; the swallowing happens in `notify`.
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
        };

        let response = self.client.post(&url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                body: truncate_to_bytes(&body, API_ERROR_SNIPPET).to_string(),
            });
        }
        Ok(())
    }
}

impl Alert for TelegramNotifier {
    async fn notify(&self, text: &str) {
        match self.send(text).await {
            Ok(()) => tracing::debug!("telegram message delivered"),
            Err(e) => tracing::warn!(error = %e, "failed to deliver telegram message"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivery_failure_never_escapes() {
        // Nothing listens on this port; send() fails, notify() must not.
        let notifier = TelegramNotifier::new("token".into(), "42".into())
            .unwrap()
            .with_api_base("http://127.0.0.1:9");

        notifier.notify("down").await;
    }
}
