//! Error conversion glue between the domain, storage, and service layers.
//!
//! The domain layer must not depend on repository or service error types, so
//! the conversions live here instead of next to [`TypeConstraintError`].

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        Self::ValidationError(val.to_string())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(val: RepositoryError) -> Self {
        match val {
            RepositoryError::NotFound => Self::NotFound("record not found".to_string()),
            RepositoryError::ValidationError(message)
            | RepositoryError::ConstraintViolation(message) => {
                Self::Validation(crate::forms::FieldErrors::single("record", message))
            }
            other => Self::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_errors_map_onto_service_taxonomy() {
        assert_eq!(
            ServiceError::from(RepositoryError::NotFound).kind(),
            "NOT_FOUND"
        );
        assert_eq!(
            ServiceError::from(RepositoryError::ConstraintViolation("dup".into())).kind(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            ServiceError::from(RepositoryError::ConnectionError("down".into())).kind(),
            "STORAGE_ERROR"
        );
    }
}
