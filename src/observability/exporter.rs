//! Prometheus scrape endpoint.

use std::io;
use std::net::SocketAddr;

use axum::{extract::State, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

/// Serves `GET /metrics` for external scraping.
///
/// Binding is split from serving so a port conflict surfaces as a fatal
/// startup error instead of dying inside a spawned task.
pub struct MetricsServer {
    listener: TcpListener,
    handle: PrometheusHandle,
}

impl MetricsServer {
    /// Bind the scrape endpoint. Failure here is fatal to startup.
    pub async fn bind(addr: SocketAddr, handle: PrometheusHandle) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, handle })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until the shutdown signal fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> io::Result<()> {
        let app = Router::new()
            .route("/metrics", get(render))
            .with_state(self.handle)
            .layer(TraceLayer::new_for_http());

        axum::serve(self.listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("metrics exporter received shutdown signal");
            })
            .await
    }
}

async fn render(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}
