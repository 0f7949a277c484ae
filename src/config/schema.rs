//! Configuration schema.

use std::net::SocketAddr;
use std::time::Duration;

use chrono_tz::Tz;
use url::Url;

pub const DEFAULT_PROMETHEUS_PORT: u16 = 8000;
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_TIMEZONE: Tz = Tz::Asia__Bishkek;

/// Immutable startup configuration.
///
/// Built once by [`Config::from_env`](crate::config::loader) and handed to
/// each subsystem by value or reference; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Login endpoint receiving the synthetic `{"email", "password"}` POST.
    pub login_url: Url,

    /// Credential pair for the synthetic login.
    pub email: String,
    pub password: String,

    /// Telegram bot token used for alert delivery.
    pub telegram_token: String,

    /// Telegram chat receiving the alerts.
    pub group_id: String,

    /// Port the Prometheus scrape endpoint binds to.
    pub prometheus_port: u16,

    /// Pause between probe ticks.
    pub check_interval: Duration,

    /// Hard deadline for one probe request.
    pub probe_timeout: Duration,

    /// Timezone used to render timestamps in alert text.
    pub timezone: Tz,
}

impl Config {
    /// Bind address for the metrics exporter.
    pub fn metrics_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.prometheus_port))
    }
}
