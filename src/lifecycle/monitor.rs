//! The probe-schedule-alert control loop.

use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;

use crate::config::Config;
use crate::notify::Alert;
use crate::observability::metrics;
use crate::probe::{Probe, ProbeOutcome};

/// Owns the process lifetime: fires the prober on a fixed interval, feeds
/// the metrics registry, and alerts on failing outcomes.
///
/// Alerting is deliberately memoryless: every failing tick alerts, with no
/// deduplication, cooldown or hysteresis. A flapping service alerts on each
/// failing tick.
pub struct Monitor<P, N> {
    prober: P,
    notifier: N,
    interval: Duration,
    timezone: Tz,
    target: String,
}

impl<P: Probe, N: Alert> Monitor<P, N> {
    pub fn new(prober: P, notifier: N, config: &Config) -> Self {
        Self {
            prober,
            notifier,
            interval: config.check_interval,
            timezone: config.timezone,
            target: config.login_url.to_string(),
        }
    }

    /// Run until the shutdown signal fires.
    ///
    /// The first tick runs immediately; afterwards the ticker fires every
    /// `interval`. A slow tick delays the next one rather than skipping it,
    /// and ticks never overlap. A signal arriving mid-tick lets the tick and
    /// its notification finish, then stops before the next one.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            target = %self.target,
            interval_secs = self.interval.as_secs(),
            "monitor starting"
        );

        self.notifier.notify(&self.startup_message()).await;

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        self.notifier.notify(SHUTDOWN_MESSAGE).await;
        tracing::info!("monitor stopped");
    }

    /// One probe-and-react cycle: exactly one outcome, exactly one set of
    /// metrics updates, at most one notification.
    async fn tick(&self) {
        let outcome = self.prober.probe().await;

        metrics::record_duration(outcome.duration());
        metrics::record_attempt(outcome.category());
        metrics::set_service_up(!outcome.is_failure());

        if let Some(message) = alert_message(&outcome, self.timezone) {
            self.notifier.notify(&message).await;
        }
    }

    fn startup_message(&self) -> String {
        format!(
            "✅ *Login monitor started*\n\nURL: `{}`\nInterval: every {}",
            self.target,
            format_interval(self.interval)
        )
    }
}

const SHUTDOWN_MESSAGE: &str = "🛑 *Login monitor stopped*";

/// Render the alert for a failing outcome; `Success` never alerts.
fn alert_message(outcome: &ProbeOutcome, tz: Tz) -> Option<String> {
    match outcome {
        ProbeOutcome::Success { .. } => None,
        ProbeOutcome::HttpError {
            status,
            body,
            duration,
            started_at,
            finished_at,
        } => Some(format!(
            "🔴 *Login failed*\n\
             ⏱ Started: `{}`\n\
             ⏱ Finished: `{}`\n\
             ⏳ Duration: `{:.2} s`\n\
             ⚠️ Status: {}\n\
             📄 Server response:\n```{}```",
            format_timestamp(started_at, tz),
            format_timestamp(finished_at, tz),
            duration.as_secs_f64(),
            status,
            body,
        )),
        ProbeOutcome::TransportError {
            message,
            duration,
            started_at,
            finished_at,
        } => Some(format!(
            "⚠️ *Login endpoint unreachable*\n\
             ⏱ Started: `{}`\n\
             ⏱ Finished: `{}`\n\
             ⏳ Duration: `{:.2} s`\n\
             ❌ Error: `{}`",
            format_timestamp(started_at, tz),
            format_timestamp(finished_at, tz),
            duration.as_secs_f64(),
            message,
        )),
    }
}

fn format_timestamp(ts: &DateTime<Utc>, tz: Tz) -> String {
    ts.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S").to_string()
}

fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        format!("{} min", secs / 60)
    } else {
        format!("{} s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use chrono::TimeZone;

    use crate::notify::Alert;

    /// Prober that replays a fixed sequence, then keeps succeeding.
    struct ScriptedProbe {
        outcomes: Mutex<VecDeque<ProbeOutcome>>,
    }

    impl ScriptedProbe {
        fn new(outcomes: Vec<ProbeOutcome>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
            }
        }

        fn next(&self) -> ProbeOutcome {
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(ProbeOutcome::Success {
                    duration: Duration::from_millis(10),
                })
        }
    }

    impl Probe for ScriptedProbe {
        async fn probe(&self) -> ProbeOutcome {
            self.next()
        }
    }

    /// Notifier that records every message instead of delivering it.
    #[derive(Clone)]
    struct RecordingAlert {
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingAlert {
        fn new() -> Self {
            Self {
                messages: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn snapshot(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Alert for RecordingAlert {
        async fn notify(&self, text: &str) {
            self.messages.lock().unwrap().push(text.to_string());
        }
    }

    fn test_config() -> Config {
        Config {
            login_url: "https://example.com/api/login".parse().unwrap(),
            email: "probe@example.com".into(),
            password: "hunter2".into(),
            telegram_token: "123:abc".into(),
            group_id: "-1001".into(),
            prometheus_port: 0,
            check_interval: Duration::from_secs(60),
            probe_timeout: Duration::from_secs(10),
            timezone: chrono_tz::UTC,
        }
    }

    fn http_error(status: u16, body: &str) -> ProbeOutcome {
        let now = Utc::now();
        ProbeOutcome::HttpError {
            status,
            body: body.into(),
            duration: Duration::from_millis(80),
            started_at: now,
            finished_at: now,
        }
    }

    fn transport_error(message: &str) -> ProbeOutcome {
        let now = Utc::now();
        ProbeOutcome::TransportError {
            message: message.into(),
            duration: Duration::from_millis(5),
            started_at: now,
            finished_at: now,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn alerts_on_failing_ticks_only() {
        let prober = ScriptedProbe::new(vec![
            ProbeOutcome::Success {
                duration: Duration::from_millis(100),
            },
            http_error(500, "server overloaded"),
            transport_error("connection refused"),
        ]);
        let notifier = RecordingAlert::new();
        let messages = notifier.clone();

        let shutdown = crate::lifecycle::Shutdown::new();
        let rx = shutdown.subscribe();
        let monitor = Monitor::new(prober, notifier, &test_config());
        let task = tokio::spawn(monitor.run(rx));

        // Startup announcement plus the two failure alerts.
        loop {
            if messages.snapshot().len() >= 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        shutdown.trigger();
        task.await.unwrap();

        let delivered = messages.snapshot();
        assert_eq!(delivered.len(), 4, "startup + 2 alerts + shutdown");
        assert!(delivered[0].contains("Login monitor started"));
        assert!(delivered[0].contains("https://example.com/api/login"));
        assert!(delivered[1].contains("500"));
        assert!(delivered[1].contains("server overloaded"));
        assert!(delivered[2].contains("connection refused"));
        assert!(delivered[3].contains("Login monitor stopped"));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_sends_stop_announcement() {
        let prober = ScriptedProbe::new(Vec::new());
        let notifier = RecordingAlert::new();
        let messages = notifier.clone();

        let shutdown = crate::lifecycle::Shutdown::new();
        let rx = shutdown.subscribe();
        let monitor = Monitor::new(prober, notifier, &test_config());
        let task = tokio::spawn(monitor.run(rx));

        loop {
            if !messages.snapshot().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        shutdown.trigger();
        task.await.unwrap();

        let delivered = messages.snapshot();
        assert!(delivered.first().unwrap().contains("started"));
        assert!(delivered.last().unwrap().contains("stopped"));
    }

    #[test]
    fn success_produces_no_alert() {
        let outcome = ProbeOutcome::Success {
            duration: Duration::from_millis(100),
        };
        assert!(alert_message(&outcome, chrono_tz::UTC).is_none());
    }

    #[test]
    fn http_alert_carries_status_body_and_timestamps() {
        let started_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let finished_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 2).unwrap();
        let outcome = ProbeOutcome::HttpError {
            status: 503,
            body: "maintenance".into(),
            duration: Duration::from_millis(2500),
            started_at,
            finished_at,
        };

        let message = alert_message(&outcome, chrono_tz::UTC).unwrap();
        assert!(message.contains("2024-03-01 12:00:00"));
        assert!(message.contains("2024-03-01 12:00:02"));
        assert!(message.contains("2.50 s"));
        assert!(message.contains("503"));
        assert!(message.contains("```maintenance```"));
    }

    #[test]
    fn timestamps_render_in_the_configured_zone() {
        let started_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let outcome = ProbeOutcome::TransportError {
            message: "timed out".into(),
            duration: Duration::from_secs(10),
            started_at,
            finished_at: started_at,
        };

        // Asia/Bishkek is UTC+6, no DST.
        let message = alert_message(&outcome, chrono_tz::Asia::Bishkek).unwrap();
        assert!(message.contains("2024-03-01 18:00:00"));
        assert!(message.contains("timed out"));
    }

    #[test]
    fn interval_formatting() {
        assert_eq!(format_interval(Duration::from_secs(1800)), "30 min");
        assert_eq!(format_interval(Duration::from_secs(90)), "90 s");
        assert_eq!(format_interval(Duration::from_secs(60)), "1 min");
    }
}
