//! # Errors
//!
//! Error taxonomy for payload synthesis and Secret reconciliation.
//!
//! Only a subset of these errors ever reaches the caller:
//! - [`Error::ImmutableType`], a malformed restart annotation
//!   ([`ValidationError::InvalidBoolean`]), [`Error::Store`] and [`Error::Timeout`]
//!   abort a reconciliation.
//! - Template, registry credential and file loading failures are recovered
//!   locally by the payload builder and only logged.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Template string is syntactically invalid
    #[error("failed to parse template: {0}")]
    Parse(String),

    /// Template references something the context does not expose
    #[error("failed to execute template: {0}")]
    Execution(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Requested Secret type differs from the persisted one
    #[error(
        "cannot change secret type: secret type is immutable (current '{current}', requested '{requested}')"
    )]
    ImmutableType { current: String, requested: String },

    /// Opaque failure from the backing store, tagged with the attempted operation
    #[error("failed to {operation} Secret '{namespace}/{name}': {source}")]
    Store {
        operation: StoreOperation,
        namespace: String,
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("reconciliation of Secret '{namespace}/{name}' timed out after {timeout:?}")]
    Timeout {
        namespace: String,
        name: String,
        timeout: Duration,
    },

    #[error("failed to marshal docker config json: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check if this error is transient (should retry)
    ///
    /// Store failures and timeouts may succeed on a later pass. Everything
    /// else needs a configuration change first.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Store { .. } | Error::Timeout { .. })
    }
}

/// Input validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("registry cannot be empty")]
    MissingRegistry,
    #[error("username cannot be empty")]
    MissingUsername,
    #[error("password cannot be empty")]
    MissingPassword,
    #[error(
        "error parsing {annotation} annotation on Secret {secret}: '{value}' must be true or false"
    )]
    InvalidBoolean {
        annotation: &'static str,
        secret: String,
        value: String,
    },
    #[error("invalid item path '{0}': expected vaults/{{vault}}/items/{{item}}")]
    InvalidItemPath(String),
}

/// Store operation attempted when a [`StoreError`] occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Get,
    Create,
    Update,
}

impl StoreOperation {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOperation::Get => "get",
            StoreOperation::Create => "create",
            StoreOperation::Update => "update",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by a [`crate::controller::reconciler::SecretStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    /// The object does not exist. Selects the create path and is never surfaced.
    #[error("secret not found")]
    NotFound,
    #[error(transparent)]
    Kube(#[from] kube::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}
