//! Configuration loading from the environment.

use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;
use url::Url;

use crate::config::schema::{
    Config, DEFAULT_CHECK_INTERVAL, DEFAULT_PROBE_TIMEOUT, DEFAULT_PROMETHEUS_PORT,
    DEFAULT_TIMEZONE,
};

/// Fatal configuration error. The process exits non-zero before any
/// scheduling or notification happens.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<String>),

    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Tests pass a map here instead of mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // An empty value counts as absent, same as an unset key.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut missing = Vec::new();
        let mut require = |key: &'static str| {
            get(key).unwrap_or_else(|| {
                missing.push(key.to_string());
                String::new()
            })
        };

        let login_url = require("LOGIN_URL");
        let email = require("EMAIL");
        let password = require("PASSWORD");
        let telegram_token = require("TELEGRAM_TOKEN");
        let group_id = require("GROUP_ID");

        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing));
        }

        let login_url = Url::parse(&login_url).map_err(|e| ConfigError::Invalid {
            name: "LOGIN_URL",
            reason: e.to_string(),
        })?;

        let prometheus_port = parse_or_default(
            get("PROMETHEUS_PORT"),
            "PROMETHEUS_PORT",
            DEFAULT_PROMETHEUS_PORT,
        )?;

        let check_interval = duration_or_default(
            get("CHECK_INTERVAL_SECS"),
            "CHECK_INTERVAL_SECS",
            DEFAULT_CHECK_INTERVAL,
        )?;

        let probe_timeout = duration_or_default(
            get("PROBE_TIMEOUT_SECS"),
            "PROBE_TIMEOUT_SECS",
            DEFAULT_PROBE_TIMEOUT,
        )?;

        let timezone: Tz = parse_or_default(get("TIMEZONE"), "TIMEZONE", DEFAULT_TIMEZONE)?;

        Ok(Config {
            login_url,
            email,
            password,
            telegram_token,
            group_id,
            prometheus_port,
            check_interval,
            probe_timeout,
            timezone,
        })
    }
}

fn parse_or_default<T>(
    raw: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn duration_or_default(
    raw: Option<String>,
    name: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let secs: u64 = parse_or_default(raw, name, default.as_secs())?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            name,
            reason: "must be greater than zero".into(),
        });
    }
    Ok(Duration::from_secs(secs))
}
