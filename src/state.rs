use std::sync::Arc;

use crate::config::Config;
use crate::errors::Result;
use crate::services::{BulkOrchestrator, Prober, RegistryService};
use crate::store::RegistryStore;

// App state
#[derive(Clone)]
pub struct AppState {
    pub registry: RegistryService,
    pub prober: Prober,
    pub bulk: BulkOrchestrator,
}

impl AppState {
    pub fn new(store: Arc<dyn RegistryStore>, config: &Config) -> Result<Self> {
        let registry = RegistryService::new(store);
        let prober = Prober::new(registry.clone(), config.probe_timeout)?;
        let bulk = BulkOrchestrator::new(registry.clone(), prober.clone())
            .with_max_concurrent_probes(config.max_concurrent_probes);

        Ok(Self {
            registry,
            prober,
            bulk,
        })
    }
}
