//! Session error types.

use thiserror::Error;
use ward_contract::ContractError;
use ward_core::{AccessError, FieldPath};

/// Errors raised by wrapped domain objects.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Mutation attempted outside a writable window.
    #[error("read-only violation: cannot set {path} outside a writable window")]
    ReadOnly { path: FieldPath },

    /// A writable window is already open on this domain.
    #[error("a writable window is already open")]
    WindowAlreadyOpen,

    /// Window requested while the contract is being enforced.
    #[error("cannot open a writable window during enforcement")]
    EnforcementInProgress,

    /// Navigation expected a wrapped object.
    #[error("{path} does not hold a domain object")]
    NotAnObject { path: FieldPath },

    /// Property access failed.
    #[error("access error: {0}")]
    Access(#[from] AccessError),

    /// Contract enforcement failed.
    #[error("contract error: {0}")]
    Contract(#[from] ContractError),
}

impl DomainError {
    pub fn read_only(path: impl Into<FieldPath>) -> Self {
        Self::ReadOnly { path: path.into() }
    }

    pub fn not_an_object(path: impl Into<FieldPath>) -> Self {
        Self::NotAnObject { path: path.into() }
    }

    /// Returns true for a rejected mutation.
    pub fn is_read_only(&self) -> bool {
        matches!(self, DomainError::ReadOnly { .. })
    }

    /// Path of a rejected mutation.
    pub fn read_only_path(&self) -> Option<&FieldPath> {
        match self {
            DomainError::ReadOnly { path } => Some(path),
            _ => None,
        }
    }

    /// The contract error, if enforcement failed.
    pub fn as_contract(&self) -> Option<&ContractError> {
        match self {
            DomainError::Contract(error) => Some(error),
            _ => None,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
