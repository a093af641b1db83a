//! Error types for entity operations.

use thiserror::Error;

use crate::advertisement::AdStatus;

/// Input rejected by an entity before any state was touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Empty value where one is required.
    #[error("{0} cannot be empty")]
    Empty(String),

    /// Password shorter than the minimum length.
    #[error("password must have at least {min} characters (got {actual})")]
    PasswordTooShort { min: usize, actual: usize },

    /// Field name that the operation does not accept.
    #[error("field '{0}' is not allowed")]
    UnknownField(String),

    /// Malformed value.
    #[error("invalid {field}: {reason}")]
    Invalid { field: String, reason: String },

    /// Numeric value outside the accepted range.
    #[error("{field} out of range: {reason}")]
    OutOfRange { field: String, reason: String },
}

/// Errors raised by entity behavior.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Target entity is not present.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Actor lacks the capability or ownership required.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Status change not allowed by the advertisement lifecycle.
    #[error("cannot move advertisement from {from} to {to}")]
    InvalidTransition { from: AdStatus, to: AdStatus },
}

/// Result type for entity operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
