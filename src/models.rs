//! Data models shared by the registry, the prober and the HTTP layer

pub mod report;
pub mod service;
pub mod validation;

pub use report::{BulkResult, FailureKind, ProbeFailure};
pub use service::{PingResult, PingTarget, ServiceConfig, ServiceRef};
