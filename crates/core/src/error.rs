//! Domain error model.

use thiserror::Error;

/// Domain-level error.
///
/// Keep this focused on deterministic validation failures. Bridge and storage
/// failures belong to their own crates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A sku was empty or otherwise malformed.
    #[error("invalid sku: {0}")]
    InvalidSku(String),

    /// A product type string was neither `inapp` nor `subs`.
    #[error("unknown product type: {0}")]
    UnknownProductType(String),

    /// A value failed validation (e.g. malformed descriptor).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn invalid_sku(msg: impl Into<String>) -> Self {
        Self::InvalidSku(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
