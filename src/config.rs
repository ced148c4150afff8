//! Configuration management for the uptimer service

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::services::bulk::DEFAULT_MAX_CONCURRENT_PROBES;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to
    pub host: String,

    /// Port the HTTP server listens on
    pub port: u16,

    /// Path of the JSON document holding the registry
    pub services_path: PathBuf,

    /// Upper bound for a single probe
    pub probe_timeout: Duration,

    /// Probes in flight at once within one bulk ping
    pub max_concurrent_probes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            services_path: PathBuf::from("data/services.json"),
            probe_timeout: Duration::from_secs(5),
            max_concurrent_probes: DEFAULT_MAX_CONCURRENT_PROBES,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }

        if let Ok(port) = env::var("PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }

        if let Ok(services_path) = env::var("SERVICES_PATH") {
            config.services_path = PathBuf::from(services_path);
        }

        if let Ok(probe_timeout) = env::var("PROBE_TIMEOUT_SECONDS") {
            if let Ok(seconds) = probe_timeout.parse::<u64>() {
                config.probe_timeout = Duration::from_secs(seconds);
            }
        }

        if let Ok(max_probes) = env::var("MAX_CONCURRENT_PROBES") {
            if let Ok(max_probes) = max_probes.parse() {
                config.max_concurrent_probes = max_probes;
            }
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("host cannot be empty".to_string());
        }

        if self.services_path.as_os_str().is_empty() {
            return Err("services_path cannot be empty".to_string());
        }

        if self.probe_timeout.is_zero() {
            return Err("probe_timeout must be greater than 0".to_string());
        }

        if self.max_concurrent_probes == 0 {
            return Err("max_concurrent_probes must be greater than 0".to_string());
        }

        Ok(())
    }
}
