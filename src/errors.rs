//! Error types for the registry, the prober and the bulk operations

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::json;
use std::fmt::Debug;
use thiserror::Error;

use crate::models::{FailureKind, ProbeFailure};

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Failures of the persisted registry document
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document is absent or contains no data
    #[error("registry document is empty")]
    Empty,

    /// The document exists but is not a valid list of services
    #[error("registry document is malformed: {0}")]
    Decode(#[from] serde_json::Error),

    /// Serializing the collection failed
    #[error("failed to encode registry document: {0}")]
    Encode(serde_json::Error),

    /// IO operation failed
    #[error("registry IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Service '{name}' was not found in the configuration")]
    NotFound { name: String },

    #[error("Service name '{name}' is already in the configuration")]
    Duplicate { name: String },

    #[error("Invalid URL '{url}' for service '{name}'")]
    InvalidUrl { name: String, url: String },

    #[error("Service name must not be empty")]
    InvalidName { name: String },

    #[error("Service '{name}' at {url} is unreachable: {message}")]
    Unreachable {
        name: String,
        url: String,
        message: String,
    },

    #[error("Service '{name}' at {url} did not answer within {timeout_ms}ms")]
    Timeout {
        name: String,
        url: String,
        timeout_ms: u64,
    },

    #[error("Service '{name}' at {url} answered with HTTP {status}")]
    BadStatus {
        name: String,
        url: String,
        status: u16,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ServiceError::NotFound { .. } => FailureKind::NotFound,
            ServiceError::Duplicate { .. } => FailureKind::Duplicate,
            ServiceError::InvalidUrl { .. } => FailureKind::InvalidUrl,
            ServiceError::InvalidName { .. } => FailureKind::InvalidName,
            ServiceError::Unreachable { .. } => FailureKind::Unreachable,
            ServiceError::Timeout { .. } => FailureKind::Timeout,
            ServiceError::BadStatus { .. } => FailureKind::BadStatus,
            ServiceError::Store(_) | ServiceError::Internal(_) => FailureKind::Internal,
        }
    }

    /// Suggested HTTP status for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::NotFound { .. } => 404,
            ServiceError::Duplicate { .. } => 409,
            ServiceError::InvalidUrl { .. } | ServiceError::InvalidName { .. } => 400,
            ServiceError::Unreachable { .. } | ServiceError::Timeout { .. } => 408,
            // the remote answered, but the target itself is reported as not found
            ServiceError::BadStatus { .. } => 404,
            ServiceError::Store(_) | ServiceError::Internal(_) => 500,
        }
    }

    /// Name of the service the failure refers to, if any
    pub fn service_name(&self) -> Option<&str> {
        match self {
            ServiceError::NotFound { name }
            | ServiceError::Duplicate { name }
            | ServiceError::InvalidUrl { name, .. }
            | ServiceError::InvalidName { name }
            | ServiceError::Unreachable { name, .. }
            | ServiceError::Timeout { name, .. }
            | ServiceError::BadStatus { name, .. } => Some(name),
            ServiceError::Store(_) | ServiceError::Internal(_) => None,
        }
    }

    /// URL of the target, for failures raised while contacting it
    pub fn target_url(&self) -> Option<&str> {
        match self {
            ServiceError::InvalidUrl { url, .. }
            | ServiceError::Unreachable { url, .. }
            | ServiceError::Timeout { url, .. }
            | ServiceError::BadStatus { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Status returned by the remote service, for `BadStatus` only
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ServiceError::BadStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(ServiceError::status_code(self))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(ResponseError::status_code(self)).json(json!({
            "error": self.to_string(),
            "status": ServiceError::status_code(self),
            "service": self.service_name(),
        }))
    }
}

/// Aggregate failure of a bulk operation.
///
/// Raised when at least one item of a batch failed. Carries every item that
/// did succeed so callers never lose completed work.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct BulkServiceError<T> {
    pub message: String,
    pub status_code: u16,
    pub successes: Vec<T>,
    pub failures: Vec<ProbeFailure>,
}

impl<T: Serialize + Debug> ResponseError for BulkServiceError<T> {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::NOT_FOUND)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(ResponseError::status_code(self)).json(json!({
            "error": self.message,
            "status": self.status_code,
            "success": self.successes,
            "failed": self.failures,
        }))
    }
}
