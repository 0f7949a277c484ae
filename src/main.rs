//! Login Sentinel daemon entry point.
//!
//! Startup order matters: configuration first (fatal on error), then the
//! metrics recorder and exporter (fatal if the port cannot be bound), then
//! the monitor loop. Traffic-facing pieces come up only when everything
//! before them succeeded.

use login_sentinel::config::Config;
use login_sentinel::lifecycle::{self, Monitor, Shutdown};
use login_sentinel::notify::TelegramNotifier;
use login_sentinel::observability::{logging, metrics, MetricsServer};
use login_sentinel::probe::LoginProber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Missing .env is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    logging::init();
    tracing::info!("login-sentinel v0.1.0 starting");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            std::process::exit(1);
        }
    };

    tracing::info!(
        login_url = %config.login_url,
        prometheus_port = config.prometheus_port,
        check_interval_secs = config.check_interval.as_secs(),
        probe_timeout_secs = config.probe_timeout.as_secs(),
        timezone = %config.timezone,
        "configuration loaded"
    );

    let handle = metrics::install_recorder()?;
    let exporter = match MetricsServer::bind(config.metrics_addr(), handle).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(
                error = %e,
                port = config.prometheus_port,
                "failed to bind metrics exporter"
            );
            std::process::exit(1);
        }
    };
    tracing::info!(address = %exporter.local_addr()?, "metrics exporter listening");

    let prober = LoginProber::new(&config)?;
    let notifier = TelegramNotifier::new(config.telegram_token.clone(), config.group_id.clone())?;
    let monitor = Monitor::new(prober, notifier, &config);

    let shutdown = Shutdown::new();

    let exporter_task = tokio::spawn(exporter.run(shutdown.subscribe()));
    let monitor_task = tokio::spawn(monitor.run(shutdown.subscribe()));

    lifecycle::wait_for_signal().await;
    shutdown.trigger();

    // Let the monitor finish its in-flight tick and stop announcement.
    if let Err(e) = monitor_task.await {
        tracing::error!(error = %e, "monitor task failed");
    }
    match exporter_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "metrics exporter failed"),
        Err(e) => tracing::error!(error = %e, "metrics exporter task failed"),
    }

    tracing::info!("shutdown complete");
    Ok(())
}
