//! Domain error model.

use thiserror::Error;

/// Result type used across the data layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Client-side validation failure.
///
/// The backend is the authority on every rule; this only covers the checks
/// the forms run before anything is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("{0}")]
    Validation(String),

    /// A role name outside the known set.
    #[error("invalid role selected: {0}")]
    InvalidRole(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
