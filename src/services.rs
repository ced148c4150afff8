//! Registry, probing and batch operations

pub mod bulk;
pub mod health;
pub mod prober;
pub mod registry;

pub use bulk::BulkOrchestrator;
pub use prober::Prober;
pub use registry::RegistryService;
