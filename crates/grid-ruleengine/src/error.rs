//! Error type for rule authors without one of their own.

use thiserror::Error;

/// Errors produced by validation rules.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("validation failed: {reason}")]
    Validation { reason: String },
}

impl RuleError {
    pub fn validation(reason: impl Into<String>) -> Self {
        RuleError::Validation {
            reason: reason.into(),
        }
    }

    /// Returns true if this is a validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, RuleError::Validation { .. })
    }
}
