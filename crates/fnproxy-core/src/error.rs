//! Error types for fatal deploy failures.
//!
//! Only pre-flight validation and record persistence abort an invocation.
//! Everything that goes wrong for a single provider or region is reported
//! as a [`crate::diagnostics::Diagnostic`] or a per-target outcome instead.

use thiserror::Error;

use crate::config::CredentialError;
use crate::records::StoreError;
use crate::types::Module;

/// Result type alias for deploy operations
pub type DeployResult<T> = Result<T, DeployError>;

#[derive(Debug, Error)]
pub enum DeployError {
    /// A module-specific option was not supplied
    #[error("missing parameter [{flag}]")]
    MissingOption { flag: &'static str },

    /// The socks verification key has the wrong size
    #[error("key must be {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// The socks callback address could not be parsed or resolved
    #[error("invalid callback address '{addr}': {reason}")]
    InvalidAddress { addr: String, reason: String },

    /// The socks auth option is not `username:password`
    #[error("invalid auth: expected username:password")]
    InvalidAuth,

    /// The reverse proxy origin is not an absolute URL
    #[error("invalid origin '{origin}': {reason}")]
    InvalidOrigin { origin: String, reason: String },

    /// The OS random source failed while generating a key
    #[error("failed to generate random key: {0}")]
    KeyGeneration(#[from] rand::Error),

    /// Credential file could not be read or parsed
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    /// Records could not be loaded before dispatch
    #[error("failed to load {module} records: {source}")]
    LoadRecords {
        module: Module,
        #[source]
        source: StoreError,
    },

    /// Records could not be persisted after dispatch
    #[error("failed to save {module} records: {source}")]
    SaveRecords {
        module: Module,
        #[source]
        source: StoreError,
    },
}
