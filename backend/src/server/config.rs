//! Listener settings and the server configuration built from them.

use ortho_config::OrthoConfig;
use serde::Deserialize;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Listener settings from CLI flags and `MEDTRACK_*` environment variables.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MEDTRACK")]
pub struct ServerSettings {
    /// Interface to bind.
    pub bind_host: Option<String>,
    /// TCP port to listen on.
    pub port: Option<u16>,
}

impl ServerSettings {
    pub fn bind_host(&self) -> &str {
        self.bind_host.as_deref().unwrap_or(DEFAULT_BIND_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Host and port pair accepted by `HttpServer::bind`.
    pub fn bind_addr(&self) -> (String, u16) {
        (self.bind_host().to_owned(), self.port())
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: (String, u16),
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: (String, u16)) -> Self {
        Self {
            bind_addr,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &ServerSettings) -> Self {
        Self::new(settings.bind_addr())
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for listener configuration parsing.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("medtrack")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env([
            ("MEDTRACK_BIND_HOST", None::<String>),
            ("MEDTRACK_PORT", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), ("0.0.0.0".to_owned(), 8080));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("MEDTRACK_BIND_HOST", Some("127.0.0.1".to_owned())),
            ("MEDTRACK_PORT", Some("9090".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_host(), "127.0.0.1");
        assert_eq!(settings.port(), 9090);
        assert_eq!(
            ServerConfig::from_settings(&settings).bind_addr,
            ("127.0.0.1".to_owned(), 9090)
        );
    }
}
