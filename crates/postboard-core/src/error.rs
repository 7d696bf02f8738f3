//! Domain-level error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ports::{AuthError, StorageError};

/// A single field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Not authorized")]
    Forbidden,

    #[error("{entity_type} not found")]
    NotFound { entity_type: &'static str },

    #[error("{0}")]
    Duplicate(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn not_authenticated() -> Self {
        Self::Unauthorized("Not authenticated".to_string())
    }

    /// Status code callers see, if the failure was classified.
    ///
    /// `None` means the boundary reports a generic server error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DomainError::Validation(_) => Some(422),
            DomainError::Unauthorized(_) => Some(401),
            DomainError::Forbidden => Some(403),
            DomainError::NotFound { .. } => Some(404),
            DomainError::Duplicate(_) | DomainError::Internal(_) => None,
        }
    }

    /// Field messages carried by a validation failure.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            DomainError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        DomainError::Internal(err.to_string())
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        DomainError::Internal(err.to_string())
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        DomainError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(DomainError::Validation(vec![]).status_code(), Some(422));
        assert_eq!(DomainError::not_authenticated().status_code(), Some(401));
        assert_eq!(DomainError::Forbidden.status_code(), Some(403));
        assert_eq!(
            DomainError::NotFound { entity_type: "Post" }.status_code(),
            Some(404)
        );
        assert_eq!(DomainError::Duplicate("x".into()).status_code(), None);
    }

    #[test]
    fn collaborator_failures_are_unclassified() {
        let err: DomainError = RepoError::Query("boom".into()).into();

        assert!(matches!(err, DomainError::Internal(_)));
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn validation_carries_field_messages() {
        let err = DomainError::Validation(vec![FieldError::new("Invalid Email")]);

        assert_eq!(err.to_string(), "Invalid input");
        assert_eq!(err.field_errors(), &[FieldError::new("Invalid Email")]);
    }
}
