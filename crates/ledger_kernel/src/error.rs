//! Unified error taxonomy for the engine
//!
//! Every domain crate reports failures through this single enum so callers
//! see one consistent taxonomy regardless of entity kind. Validation and
//! guard failures abort the current operation before anything is persisted;
//! `Backend` failures propagate unmodified and are never retried here.

use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Error type shared by all entity services and the kernel itself
#[derive(Debug, Error)]
pub enum EngineError {
    /// The key (or an embedded sub-record) does not exist
    #[error("{entity} {key} does not exist")]
    NotFound { entity: String, key: String },

    /// A create was attempted on a key that already holds a value
    #[error("{entity} {key} already exists")]
    DuplicateKey { entity: String, key: String },

    /// Malformed, missing, or out-of-range input
    #[error("validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// A state-machine guard rejected the requested transition
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// The operation is not permitted in the entity's current status
    #[error("operation not permitted: {message}")]
    InvalidState { message: String },

    /// A claim would push the approved total past the coverage amount
    #[error("claim amount {requested} exceeds remaining coverage {available}")]
    CoverageExceeded {
        requested: Decimal,
        available: Decimal,
    },

    /// The minimum interval between quality checks was not met
    #[error("minimum interval between quality checks not met ({hours_since_last}h since last check)")]
    RateLimited { hours_since_last: i64 },

    /// A stored document could not be decoded
    #[error("failed to decode stored document: {message}")]
    Decode { message: String },

    /// The external store failed; propagated unmodified, never retried
    #[error("ledger backend error: {message}")]
    Backend { message: String },
}

impl EngineError {
    /// Creates a NotFound error
    pub fn not_found(entity: impl Into<String>, key: impl fmt::Display) -> Self {
        EngineError::NotFound {
            entity: entity.into(),
            key: key.to_string(),
        }
    }

    /// Creates a DuplicateKey error
    pub fn duplicate_key(entity: impl Into<String>, key: impl fmt::Display) -> Self {
        EngineError::DuplicateKey {
            entity: entity.into(),
            key: key.to_string(),
        }
    }

    /// Creates a Validation error naming the offending field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an InvalidTransition error
    pub fn invalid_transition(from: impl fmt::Display, to: impl fmt::Display) -> Self {
        EngineError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Creates an InvalidState error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        EngineError::InvalidState {
            message: message.into(),
        }
    }

    /// Creates a Decode error
    pub fn decode(message: impl fmt::Display) -> Self {
        EngineError::Decode {
            message: message.to_string(),
        }
    }

    /// Creates a Backend error
    pub fn backend(message: impl fmt::Display) -> Self {
        EngineError::Backend {
            message: message.to_string(),
        }
    }

    /// Returns true if this error indicates the entity or sub-record was absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::NotFound { .. })
    }

    /// Returns true if this error came from the external store rather than a rule
    pub fn is_backend(&self) -> bool {
        matches!(self, EngineError::Backend { .. })
    }
}
