use log::{debug, info, warn};
use reqwest::Client as HttpClient;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::errors::{Result, ServiceError};
use crate::models::validation::is_valid_url;
use crate::models::{PingResult, PingTarget, ServiceConfig, ServiceRef};
use crate::services::registry::RegistryService;

/// Single-attempt reachability checks against registered or ad-hoc services
#[derive(Clone)]
pub struct Prober {
    client: HttpClient,
    registry: RegistryService,
    timeout: Duration,
}

impl Prober {
    pub fn new(registry: RegistryService, probe_timeout: Duration) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(probe_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(format!("uptimer-api/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ServiceError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, registry, probe_timeout))
    }

    pub fn with_client(client: HttpClient, registry: RegistryService, probe_timeout: Duration) -> Self {
        Self {
            client,
            registry,
            timeout: probe_timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn ping_by_name(&self, name: &str) -> Result<PingResult> {
        self.probe(PingTarget::Ref(ServiceRef::new(name))).await
    }

    /// Probe a target, looking up its URL in the registry when it has none
    pub async fn probe(&self, target: PingTarget) -> Result<PingResult> {
        let service = self.resolve(target).await?;
        self.check_service(&service).await
    }

    async fn resolve(&self, target: PingTarget) -> Result<ServiceConfig> {
        match target {
            PingTarget::Ref(service) => self.registry.get(&service.name).await,
            PingTarget::Config(config) => {
                if !is_valid_url(&config.url) {
                    return Err(ServiceError::InvalidUrl {
                        name: config.name,
                        url: config.url,
                    });
                }
                Ok(config)
            }
        }
    }

    /// Issue one GET and time the round trip
    pub async fn check_service(&self, service: &ServiceConfig) -> Result<PingResult> {
        debug!("Pinging service {} at {}", service.name, service.url);

        let start_time = Instant::now();
        let response = match timeout(self.timeout, self.client.get(&service.url).send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if e.is_timeout() => return Err(self.timed_out(service)),
            Ok(Err(e)) => {
                warn!("Failed to connect to service {}: {}", service.name, e);
                return Err(ServiceError::Unreachable {
                    name: service.name.clone(),
                    url: service.url.clone(),
                    message: e.to_string(),
                });
            }
            Err(_) => return Err(self.timed_out(service)),
        };
        let elapsed = start_time.elapsed();

        let status = response.status();
        if status.as_u16() >= 400 {
            warn!("Service {} returned status {}", service.name, status);
            return Err(ServiceError::BadStatus {
                name: service.name.clone(),
                url: service.url.clone(),
                status: status.as_u16(),
            });
        }

        info!(
            "Service {} answered {} in {}ms",
            service.name,
            status.as_u16(),
            elapsed.as_millis()
        );

        Ok(PingResult {
            name: service.name.clone(),
            url: service.url.clone(),
            response_time_seconds: elapsed.as_secs_f64(),
        })
    }

    fn timed_out(&self, service: &ServiceConfig) -> ServiceError {
        warn!(
            "Service {} did not answer within {}ms",
            service.name,
            self.timeout.as_millis()
        );
        ServiceError::Timeout {
            name: service.name.clone(),
            url: service.url.clone(),
            timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }
}
