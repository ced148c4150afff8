use futures::stream::{self, StreamExt};
use log::{info, warn};

use crate::errors::BulkServiceError;
use crate::models::{BulkResult, PingResult, PingTarget, ServiceConfig, ServiceRef};
use crate::services::prober::Prober;
use crate::services::registry::RegistryService;

pub const DEFAULT_MAX_CONCURRENT_PROBES: usize = 16;

/// Batch operations with partitioned success/failure reporting.
///
/// No item's failure stops the rest of its batch.
#[derive(Clone)]
pub struct BulkOrchestrator {
    registry: RegistryService,
    prober: Prober,
    max_concurrent_probes: usize,
}

impl BulkOrchestrator {
    pub fn new(registry: RegistryService, prober: Prober) -> Self {
        Self {
            registry,
            prober,
            max_concurrent_probes: DEFAULT_MAX_CONCURRENT_PROBES,
        }
    }

    pub fn with_max_concurrent_probes(mut self, max_concurrent_probes: usize) -> Self {
        self.max_concurrent_probes = max_concurrent_probes.max(1);
        self
    }

    /// Probe every target concurrently; successes come back in input order
    pub async fn probe_all(
        &self,
        targets: Vec<PingTarget>,
    ) -> Result<Vec<PingResult>, BulkServiceError<PingResult>> {
        let total = targets.len();
        let prober = &self.prober;

        let outcomes: Vec<_> = stream::iter(targets.into_iter().enumerate())
            .map(|(index, target)| async move {
                let name = target.name().to_string();
                let outcome = prober.probe(target).await;
                (index, name, outcome)
            })
            .buffered(self.max_concurrent_probes)
            .collect()
            .await;

        let mut result = BulkResult::with_capacity(total);
        for (index, name, outcome) in outcomes {
            result.record(index, &name, outcome);
        }

        summarize("Pinged", &result);
        result.into_result("Not all services are pingable")
    }

    /// Add services one after another, in input order
    pub async fn add_all(
        &self,
        services: Vec<ServiceConfig>,
    ) -> Result<Vec<ServiceConfig>, BulkServiceError<ServiceConfig>> {
        let mut result = BulkResult::with_capacity(services.len());

        for (index, service) in services.into_iter().enumerate() {
            let name = service.name.clone();
            let outcome = self.registry.add(service).await;
            result.record(index, &name, outcome);
        }

        summarize("Added", &result);
        result.into_result("Not all services are added")
    }

    /// Delete services one after another; a repeated name fails as not found
    pub async fn delete_all(
        &self,
        services: Vec<ServiceRef>,
    ) -> Result<Vec<ServiceConfig>, BulkServiceError<ServiceConfig>> {
        let mut result = BulkResult::with_capacity(services.len());

        for (index, service) in services.iter().enumerate() {
            let outcome = self.registry.delete(service).await;
            result.record(index, &service.name, outcome);
        }

        summarize("Deleted", &result);
        result.into_result("Not all services are deleted")
    }
}

fn summarize<T>(action: &str, result: &BulkResult<T>) {
    if result.is_complete() {
        info!("{} {} services", action, result.successes.len());
    } else {
        warn!(
            "{} {} of {} services, {} failed",
            action,
            result.successes.len(),
            result.len(),
            result.failures.len()
        );
    }
}
