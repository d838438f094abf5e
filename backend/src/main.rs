//! Service entry-point: loads settings, initialises tracing, serves the API.

mod server;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use medtrack::inbound::http::health::HealthState;
use server::{ServerConfig, ServerSettings, create_server};

#[cfg(feature = "metrics")]
fn initialize_metrics<E, F>(make_metrics: F) -> Option<PrometheusMetrics>
where
    F: FnOnce() -> Result<PrometheusMetrics, E>,
    E: std::fmt::Display,
{
    make_metrics()
        .inspect_err(|error| {
            warn!(
                error = %error,
                "failed to initialise Prometheus metrics; continuing without metrics"
            );
        })
        .ok()
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let config = ServerConfig::from_settings(&settings);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(|| {
        PrometheusMetricsBuilder::new("medtrack")
            .endpoint("/metrics")
            .build()
    }));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
