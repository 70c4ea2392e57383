//! Record store error types.
//!
//! These errors describe failures talking to the system that holds account
//! records. They carry enough classification for a retry policy to decide
//! whether a call is worth repeating.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during record store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record matches the identity
    #[error("Account not found: {identity}")]
    NotFound { identity: String },

    /// The store is temporarily unreachable or failing
    #[error("Record store unavailable: {message}")]
    Unavailable {
        message: String,
        retry_after: Option<Duration>,
    },

    /// The store throttled the caller
    #[error("Rate limited by record store")]
    RateLimited { retry_after: Option<Duration> },

    /// The store refused the request; repeating it will not help
    #[error("Request rejected by record store: {message}")]
    Rejected { message: String },

    /// Unexpected store failure
    #[error("Internal record store error: {message}")]
    Internal { message: String },
}

impl StoreError {
    /// Create a new NotFound error.
    pub fn not_found(identity: impl Into<String>) -> Self {
        Self::NotFound {
            identity: identity.into(),
        }
    }

    /// Create a new Unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            retry_after: None,
        }
    }

    /// Create a new RateLimited error.
    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        Self::RateLimited { retry_after }
    }

    /// Create a new Rejected error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Create a new Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the failure is transient and the call may be retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Unavailable { .. } | StoreError::RateLimited { .. }
        )
    }

    /// Server-supplied delay before the next attempt, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            StoreError::Unavailable { retry_after, .. } | StoreError::RateLimited { retry_after } => {
                *retry_after
            }
            _ => None,
        }
    }
}

/// Result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;
