//! Error types for connector operations.
//!
//! Transform-level problems (a single malformed change in an update batch)
//! are not errors: they are reported as [`ChangeDiagnostic`](crate::account::ChangeDiagnostic)
//! values and the batch continues. Everything in this module is fatal to the
//! operation that produced it and is propagated to the caller unchanged.

use crate::storage::StoreError;

/// Main error type for connector operations.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// The account schema could not be obtained or normalized
    #[error("Schema unavailable: {message}")]
    SchemaUnavailable { message: String },

    /// No remote record matches the requested identity
    #[error("Account not found: {identity}")]
    RecordNotFound { identity: String },

    /// A write to the remote system failed after the store's retry policy was exhausted
    #[error("Failed to update account '{identity}': {source}")]
    RemoteWriteFailure {
        identity: String,
        #[source]
        source: StoreError,
    },

    /// Enabling or disabling an account failed
    #[error(
        "Failed to {action} account '{identity}'. Please check if {status_attribute} is in your schema attribute: {source}"
    )]
    StatusToggle {
        identity: String,
        action: StatusAction,
        status_attribute: String,
        #[source]
        source: StoreError,
    },

    /// Any other record store failure
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid connector configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Direction of an account status toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Enable,
    Disable,
}

impl std::fmt::Display for StatusAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusAction::Enable => write!(f, "enable"),
            StatusAction::Disable => write!(f, "disable"),
        }
    }
}

impl ConnectorError {
    /// Create a schema unavailable error.
    pub fn schema_unavailable(message: impl Into<String>) -> Self {
        Self::SchemaUnavailable {
            message: message.into(),
        }
    }

    /// Create a record not found error.
    pub fn record_not_found(identity: impl Into<String>) -> Self {
        Self::RecordNotFound {
            identity: identity.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Short machine-readable code for the error category.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConnectorError::SchemaUnavailable { .. } => "SCHEMA_UNAVAILABLE",
            ConnectorError::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            ConnectorError::RemoteWriteFailure { .. } => "REMOTE_WRITE_FAILURE",
            ConnectorError::StatusToggle { .. } => "STATUS_TOGGLE_FAILURE",
            ConnectorError::Store(_) => "STORE_ERROR",
            ConnectorError::Config(_) => "CONFIGURATION_ERROR",
            ConnectorError::Json(_) => "JSON_ERROR",
        }
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;
