//! Contract error types.

use thiserror::Error;

/// Result type for contract enforcement.
pub type ContractResult<T> = Result<T, ContractError>;

/// Errors that abort contract enforcement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// A check reported an error and the strategy escalated it.
    #[error("Failed validation: {message}")]
    ValidationFailed { message: String },

    /// A custom strategy stopped enforcement for its own reasons.
    #[error("Enforcement aborted: {message}")]
    Aborted { message: String },
}

impl ContractError {
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    pub fn aborted(message: impl Into<String>) -> Self {
        Self::Aborted {
            message: message.into(),
        }
    }

    /// The message carried by the error.
    pub fn message(&self) -> &str {
        match self {
            ContractError::ValidationFailed { message } | ContractError::Aborted { message } => {
                message
            }
        }
    }
}
