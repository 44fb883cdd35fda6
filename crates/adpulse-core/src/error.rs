// Error types for the analytics engine

use thiserror::Error;

/// Result type alias for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors that can occur while answering an aggregation query
///
/// Absent payload fields are deliberately NOT represented here: extraction
/// failures degrade to `None` and are excluded from aggregation inputs.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A request parameter failed validation before any store access
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The event store failed (I/O, timeout, connectivity); transient,
    /// retry policy belongs to the caller
    #[error("event store error: {0}")]
    Store(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AnalyticsError {
    /// Create an invalid-parameter error
    pub fn param(msg: impl Into<String>) -> Self {
        AnalyticsError::InvalidParameter(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        AnalyticsError::Store(msg.into())
    }
}
