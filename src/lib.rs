//! Uptimer service library
//!
//! Keeps a persisted registry of named network services and checks their
//! reachability and response time, one at a time or in bulk.

pub mod config;
pub mod controllers;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

pub use config::Config;
pub use errors::{BulkServiceError, Result, ServiceError, StoreError};
pub use models::{
    BulkResult, FailureKind, PingResult, PingTarget, ProbeFailure, ServiceConfig, ServiceRef,
};
pub use services::{BulkOrchestrator, Prober, RegistryService};
pub use state::AppState;
pub use store::{JsonFileStore, MemoryStore, RegistryStore};
