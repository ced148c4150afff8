use log::{info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::errors::{Result, ServiceError, StoreError};
use crate::models::{ServiceConfig, ServiceRef};
use crate::store::RegistryStore;

/// Registry of monitored services on top of a [`RegistryStore`].
///
/// Nothing is cached between calls: every operation reads the full collection
/// from the store. Mutations hold `write_lock` from read to write so that
/// concurrent writers cannot overwrite each other's changes.
#[derive(Clone)]
pub struct RegistryService {
    store: Arc<dyn RegistryStore>,
    write_lock: Arc<Mutex<()>>,
}

impl RegistryService {
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn load(&self) -> Result<Vec<ServiceConfig>> {
        match self.store.read_all().await {
            Ok(records) => Ok(records),
            Err(StoreError::Empty) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list(&self) -> Result<Vec<ServiceConfig>> {
        self.load().await
    }

    pub async fn get(&self, name: &str) -> Result<ServiceConfig> {
        let records = self.load().await?;
        records
            .into_iter()
            .find(|record| record.matches(name))
            .ok_or_else(|| ServiceError::NotFound {
                name: name.to_string(),
            })
    }

    pub async fn add(&self, config: ServiceConfig) -> Result<ServiceConfig> {
        config.validate()?;

        let _guard = self.write_lock.lock().await;

        let mut records = match self.store.read_all().await {
            Ok(records) => records,
            Err(StoreError::Empty) => Vec::new(),
            Err(StoreError::Decode(e)) => {
                warn!(
                    "Registry document is unreadable ({}), starting over with service '{}'",
                    e, config.name
                );
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        if position(&records, &config.name).is_some() {
            info!("Rejected duplicate service: {}", config.name);
            return Err(ServiceError::Duplicate { name: config.name });
        }

        records.push(config.clone());
        self.store.write_all(&records).await?;

        info!("Service '{}' added ({})", config.name, config.url);
        Ok(config)
    }

    pub async fn delete(&self, service: &ServiceRef) -> Result<ServiceConfig> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load().await?;
        let index = position(&records, &service.name).ok_or_else(|| ServiceError::NotFound {
            name: service.name.clone(),
        })?;

        let removed = records.remove(index);
        self.store.write_all(&records).await?;

        info!("Service '{}' removed successfully", removed.name);
        Ok(removed)
    }

    /// Replace the configuration of `old`.
    ///
    /// A changed name is a rename: the new name must be free, the renamed record
    /// moves to the end of the collection. Either way the registry is written
    /// once, so a rejected rename leaves the old record in place.
    pub async fn update(&self, old: &ServiceRef, updated: ServiceConfig) -> Result<ServiceConfig> {
        updated.validate()?;

        let _guard = self.write_lock.lock().await;

        let mut records = self.load().await?;
        let old_index = position(&records, &old.name).ok_or_else(|| ServiceError::NotFound {
            name: old.name.clone(),
        })?;

        if records[old_index].name != updated.name {
            // a case-only rename finds the record being renamed
            if let Some(taken) = position(&records, &updated.name) {
                if taken != old_index {
                    info!(
                        "Rejected rename of '{}' to taken name '{}'",
                        records[old_index].name, updated.name
                    );
                    return Err(ServiceError::Duplicate { name: updated.name });
                }
            }

            let previous = records.remove(old_index);
            records.push(updated.clone());
            self.store.write_all(&records).await?;

            info!("Service '{}' renamed to '{}'", previous.name, updated.name);
            return Ok(updated);
        }

        records[old_index] = updated.clone();
        self.store.write_all(&records).await?;

        info!("Service '{}' updated ({})", updated.name, updated.url);
        Ok(updated)
    }
}

fn position(records: &[ServiceConfig], name: &str) -> Option<usize> {
    records.iter().position(|record| record.matches(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonFileStore, MemoryStore};

    fn registry_with(records: Vec<ServiceConfig>) -> (RegistryService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::with_records(records));
        (RegistryService::new(store.clone()), store)
    }

    fn fake_config() -> Vec<ServiceConfig> {
        (0..10)
            .map(|i| {
                ServiceConfig::new(format!("test-{}", i), "https://test.url").with_auto_ping(false)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_get_service() {
        let (registry, _) = registry_with(fake_config());

        assert_eq!(registry.list().await.unwrap(), fake_config());
        assert_eq!(registry.get("test-0").await.unwrap(), fake_config()[0]);
        assert_eq!(registry.get("TEST-0").await.unwrap(), fake_config()[0]);

        let missing = registry.get("fail").await;
        assert!(matches!(missing, Err(ServiceError::NotFound { name }) if name == "fail"));
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let registry = RegistryService::new(Arc::new(MemoryStore::new()));
        assert!(registry.list().await.unwrap().is_empty());
        assert!(matches!(
            registry.get("a").await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_service() {
        let (registry, store) = registry_with(fake_config());
        let new_service = ServiceConfig::new("foo", "https://foo.url").with_auto_ping(false);

        assert_eq!(registry.add(new_service.clone()).await.unwrap(), new_service);
        assert_eq!(registry.get("foo").await.unwrap(), new_service);

        let stored = store.read_all().await.unwrap();
        assert_eq!(stored.len(), 11);
        assert_eq!(stored.last(), Some(&new_service));
    }

    #[tokio::test]
    async fn test_add_duplicate_leaves_record_untouched() {
        let (registry, _) = registry_with(vec![ServiceConfig::new("a", "https://a.test")]);

        let result = registry.add(ServiceConfig::new("A", "https://x.test")).await;
        assert!(matches!(result, Err(ServiceError::Duplicate { .. })));

        let existing = registry.get("a").await.unwrap();
        assert_eq!(existing.url, "https://a.test");
        assert_eq!(registry.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_url_before_write() {
        let (registry, store) = registry_with(Vec::new());

        let result = registry.add(ServiceConfig::new("bad", "htt://bad")).await;
        assert!(matches!(result, Err(ServiceError::InvalidUrl { .. })));
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_seeds_empty_store() {
        let registry = RegistryService::new(Arc::new(MemoryStore::new()));
        let service = ServiceConfig::new("first", "https://first.test");

        registry.add(service.clone()).await.unwrap();
        assert_eq!(registry.list().await.unwrap(), vec![service]);
    }

    #[tokio::test]
    async fn test_add_seeds_unreadable_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("services.json");
        std::fs::write(&path, "not json").unwrap();
        let registry = RegistryService::new(Arc::new(JsonFileStore::new(&path)));

        assert!(matches!(registry.list().await, Err(ServiceError::Store(_))));

        let service = ServiceConfig::new("first", "https://first.test");
        registry.add(service.clone()).await.unwrap();
        assert_eq!(registry.list().await.unwrap(), vec![service]);
    }

    #[tokio::test]
    async fn test_delete() {
        let (registry, _) = registry_with(fake_config());
        let to_delete = fake_config()[0].clone();

        assert_eq!(registry.delete(&to_delete.to_ref()).await.unwrap(), to_delete);
        assert!(matches!(
            registry.get(&to_delete.name).await,
            Err(ServiceError::NotFound { .. })
        ));

        let again = registry.delete(&ServiceRef::new(to_delete.name.clone())).await;
        assert!(matches!(again, Err(ServiceError::NotFound { .. })));
        assert_eq!(registry.list().await.unwrap().len(), 9);
    }

    #[tokio::test]
    async fn test_case_mismatched_scenario() {
        let (registry, _) = registry_with(vec![ServiceConfig::new("a", "https://a.test")]);

        assert_eq!(registry.get("A").await.unwrap().name, "a");
        assert!(matches!(
            registry.add(ServiceConfig::new("a", "https://x.test")).await,
            Err(ServiceError::Duplicate { .. })
        ));

        registry.delete(&ServiceRef::new("a")).await.unwrap();
        assert!(matches!(
            registry.get("a").await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_in_place() {
        let (registry, _) = registry_with(fake_config());
        let updated = ServiceConfig::new("test-3", "https://other.url");

        let result = registry
            .update(&ServiceRef::new("TEST-3"), updated.clone())
            .await
            .unwrap();
        assert_eq!(result, updated);

        let records = registry.list().await.unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records[3], updated);
    }

    #[tokio::test]
    async fn test_update_rename() {
        let (registry, _) = registry_with(fake_config());
        let renamed = ServiceConfig::new("renamed", "https://test.url");

        registry
            .update(&ServiceRef::new("test-0"), renamed.clone())
            .await
            .unwrap();

        assert!(matches!(
            registry.get("test-0").await,
            Err(ServiceError::NotFound { .. })
        ));
        let records = registry.list().await.unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records.last(), Some(&renamed));
    }

    #[tokio::test]
    async fn test_rename_to_taken_name_keeps_original() {
        let (registry, _) = registry_with(fake_config());

        let result = registry
            .update(
                &ServiceRef::new("test-0"),
                ServiceConfig::new("test-1", "https://elsewhere.url"),
            )
            .await;
        assert!(matches!(result, Err(ServiceError::Duplicate { name }) if name == "test-1"));

        assert_eq!(registry.get("test-0").await.unwrap(), fake_config()[0]);
        assert_eq!(registry.get("test-1").await.unwrap(), fake_config()[1]);
        assert_eq!(registry.list().await.unwrap(), fake_config());
    }

    #[tokio::test]
    async fn test_case_only_rename() {
        let (registry, _) = registry_with(vec![ServiceConfig::new("api", "https://api.test")]);

        registry
            .update(&ServiceRef::new("api"), ServiceConfig::new("API", "https://api.test"))
            .await
            .unwrap();

        let records = registry.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "API");
    }

    #[tokio::test]
    async fn test_update_missing_service() {
        let (registry, _) = registry_with(fake_config());

        let result = registry
            .update(&ServiceRef::new("fail"), ServiceConfig::new("fail", "https://fail.url"))
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileStore::new(dir.path().join("services.json")));
        let registry = RegistryService::new(store);

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry
                        .add(ServiceConfig::new(format!("svc-{}", i), "https://svc.test"))
                        .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let records = registry.list().await.unwrap();
        assert_eq!(records.len(), 20);
        for i in 0..20 {
            assert!(registry.get(&format!("svc-{}", i)).await.is_ok());
        }
    }
}
