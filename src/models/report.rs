use serde::{Deserialize, Serialize};

use crate::errors::{BulkServiceError, ServiceError};

/// HTTP status reported for a bulk operation with at least one failed item
pub const BULK_FAILURE_STATUS: u16 = 404;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotFound,
    Duplicate,
    InvalidUrl,
    InvalidName,
    Unreachable,
    BadStatus,
    Timeout,
    Internal,
}

/// One failed item of a batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeFailure {
    pub kind: FailureKind,
    pub message: String,
    /// Name of the offending service as given in the request
    pub name: String,
    /// Position of the item in the request batch
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Suggested HTTP status for this item
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
}

impl ProbeFailure {
    pub fn from_error(index: usize, name: &str, error: &ServiceError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
            name: name.to_string(),
            index,
            url: error.target_url().map(str::to_string),
            status: error.status_code(),
            http_status: error.http_status(),
        }
    }
}

/// Successes and failures of a batch, both in input order
#[derive(Debug, Clone, PartialEq)]
pub struct BulkResult<T> {
    pub successes: Vec<T>,
    pub failures: Vec<ProbeFailure>,
}

impl<T> Default for BulkResult<T> {
    fn default() -> Self {
        Self {
            successes: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> BulkResult<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            successes: Vec::with_capacity(capacity),
            failures: Vec::new(),
        }
    }

    /// Sort one item's outcome into the matching partition
    pub fn record(&mut self, index: usize, name: &str, outcome: Result<T, ServiceError>) {
        match outcome {
            Ok(item) => self.successes.push(item),
            Err(error) => self
                .failures
                .push(ProbeFailure::from_error(index, name, &error)),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All items or, if anything failed, an aggregate error keeping both partitions
    pub fn into_result(self, message: &str) -> Result<Vec<T>, BulkServiceError<T>> {
        if self.failures.is_empty() {
            return Ok(self.successes);
        }

        Err(BulkServiceError {
            message: message.to_string(),
            status_code: BULK_FAILURE_STATUS,
            successes: self.successes,
            failures: self.failures,
        })
    }
}
