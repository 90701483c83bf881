use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

use crate::metrics::describe_engine_metrics;

/// Install the Prometheus recorder with an HTTP scrape endpoint at `addr`.
///
/// Must be called from inside a tokio runtime; the listener runs as a task
/// on it.
pub fn install_prometheus(addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    describe_engine_metrics();

    info!("Prometheus metrics available at http://{}/metrics", addr);
    Ok(())
}
