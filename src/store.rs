//! Persistence of the service registry
//!
//! The registry is always read and written as one complete collection. There
//! are no partial or merging writes.

mod json_file;

pub use json_file::JsonFileStore;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::StoreError;
use crate::models::ServiceConfig;

#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Read every stored record in insertion order.
    ///
    /// Fails with [`StoreError::Empty`] when nothing has been stored yet.
    async fn read_all(&self) -> Result<Vec<ServiceConfig>, StoreError>;

    /// Replace the stored collection with `records`
    async fn write_all(&self, records: &[ServiceConfig]) -> Result<(), StoreError>;
}

/// Registry kept in memory, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Option<Vec<ServiceConfig>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ServiceConfig>) -> Self {
        Self {
            records: RwLock::new(Some(records)),
        }
    }
}

#[async_trait]
impl RegistryStore for MemoryStore {
    async fn read_all(&self) -> Result<Vec<ServiceConfig>, StoreError> {
        self.records.read().await.clone().ok_or(StoreError::Empty)
    }

    async fn write_all(&self, records: &[ServiceConfig]) -> Result<(), StoreError> {
        *self.records.write().await = Some(records.to_vec());
        Ok(())
    }
}
