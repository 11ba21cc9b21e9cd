//! Error types for the extraction service boundary

use thiserror::Error;

/// Failures at the external extraction service boundary.
///
/// None of these cross the crate boundary: the extractor recovers from
/// every variant by falling back to local pattern matching.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Network-level failure reaching the service
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Service answered with a non-success status
    #[error("Service returned status {0}")]
    Status(u16),

    /// Service did not answer within the caller's deadline
    #[error("Service call timed out")]
    Timeout,

    /// Response arrived but did not match the expected result shape
    #[error("Malformed service response: {0}")]
    MalformedResponse(String),
}

/// Result type for service-boundary operations
pub type Result<T> = std::result::Result<T, ServiceError>;
