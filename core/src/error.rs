//! Error taxonomy for the todo use cases.

use crate::types::{FieldError, ValidationReason};
use thiserror::Error;

/// Result type alias for todo use-case operations.
pub type Result<T> = std::result::Result<T, TodoUseCaseError>;

/// The closed error taxonomy crossing the use-case boundary.
///
/// Nothing else escapes a use case: every repository failure is caught and
/// mapped into exactly one of these variants. The route collaborator is
/// expected to map `Validation` → 422, `Conflict` → 409, `NotFound` → 404
/// and `Internal` → 500.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TodoUseCaseError {
    /// Malformed or rule-violating input, with field-level detail.
    #[error("validation error")]
    Validation {
        /// Field-level failures, in the order they were detected.
        errors: Vec<FieldError>,
    },

    /// A structurally valid request that violates a relational invariant
    /// (subtask nesting, subtask recurrence, incomplete subtasks blocking
    /// completion).
    #[error("conflict: {detail}")]
    Conflict {
        /// Human-readable description of the violated invariant.
        detail: String,
    },

    /// The referenced todo does not exist for this owner.
    #[error("todo not found")]
    NotFound,

    /// An unanticipated repository failure. The underlying cause is logged,
    /// never carried to the caller.
    #[error("internal error")]
    Internal,
}

impl TodoUseCaseError {
    /// Build a validation error from field failures.
    #[must_use]
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors }
    }

    /// Build a validation error for a single field.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, reason: ValidationReason) -> Self {
        Self::Validation {
            errors: vec![FieldError::new(field, reason)],
        }
    }

    /// Build a conflict error with a human-readable detail.
    #[must_use]
    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::Conflict {
            detail: detail.into(),
        }
    }

    /// Returns `true` if this error is caused by the caller's input rather
    /// than by the system.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::Conflict { .. } | Self::NotFound
        )
    }
}
