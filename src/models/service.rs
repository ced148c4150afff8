use serde::{Deserialize, Serialize};

use crate::errors::{Result, ServiceError};
use crate::models::validation::{is_valid_name, is_valid_url};

/// Identity of a service in the registry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ServiceRef {
    pub name: String,
}

impl ServiceRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Persisted configuration of a monitored service
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub name: String,
    pub url: String,
    /// Whether the service takes part in automated pings
    #[serde(rename = "ping", alias = "autoPing", default = "default_auto_ping")]
    pub auto_ping: bool,
}

fn default_auto_ping() -> bool {
    true
}

impl ServiceConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            auto_ping: true,
        }
    }

    pub fn with_auto_ping(mut self, auto_ping: bool) -> Self {
        self.auto_ping = auto_ping;
        self
    }

    pub fn to_ref(&self) -> ServiceRef {
        ServiceRef::new(self.name.clone())
    }

    /// Case-insensitive match against a service name
    pub fn matches(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }

    /// Check the name and URL shape before anything is persisted
    pub fn validate(&self) -> Result<()> {
        if !is_valid_name(&self.name) {
            return Err(ServiceError::InvalidName {
                name: self.name.clone(),
            });
        }

        if !is_valid_url(&self.url) {
            return Err(ServiceError::InvalidUrl {
                name: self.name.clone(),
                url: self.url.clone(),
            });
        }

        Ok(())
    }
}

/// Outcome of a successful probe. Never persisted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PingResult {
    pub name: String,
    pub url: String,
    #[serde(rename = "response_time")]
    pub response_time_seconds: f64,
}

/// A probe request: either a bare name resolved through the registry, or an
/// ad-hoc service carrying its own URL.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum PingTarget {
    Config(ServiceConfig),
    Ref(ServiceRef),
}

impl PingTarget {
    pub fn name(&self) -> &str {
        match self {
            PingTarget::Config(config) => &config.name,
            PingTarget::Ref(service) => &service.name,
        }
    }
}

impl From<ServiceRef> for PingTarget {
    fn from(service: ServiceRef) -> Self {
        PingTarget::Ref(service)
    }
}

impl From<ServiceConfig> for PingTarget {
    fn from(config: ServiceConfig) -> Self {
        PingTarget::Config(config)
    }
}

pub fn names_match(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}
