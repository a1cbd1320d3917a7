use diesel::r2d2::{Error as R2D2Error, PoolError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,

            DieselError::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation => Self::ConstraintViolation(format!(
                        "Unique constraint violation: {message}"
                    )),
                    DatabaseErrorKind::NotNullViolation => Self::ConstraintViolation(format!(
                        "Not null constraint violation: {message}"
                    )),
                    DatabaseErrorKind::CheckViolation => Self::ConstraintViolation(format!(
                        "Check constraint violation: {message}"
                    )),
                    _ => Self::DatabaseError(message),
                }
            }

            DieselError::SerializationError(e) | DieselError::DeserializationError(e) => {
                Self::DatabaseError(format!("Row conversion error: {e}"))
            }

            DieselError::QueryBuilderError(e) => {
                Self::DatabaseError(format!("Query builder error: {e}"))
            }

            DieselError::RollbackTransaction | DieselError::BrokenTransactionManager => {
                Self::DatabaseError(format!("Transaction error: {err}"))
            }

            _ => Self::Unexpected(format!("Unexpected diesel error: {err}")),
        }
    }
}

impl From<R2D2Error> for RepositoryError {
    fn from(err: R2D2Error) -> Self {
        Self::ConnectionError(err.to_string())
    }
}

impl From<PoolError> for RepositoryError {
    fn from(err: PoolError) -> Self {
        Self::ConnectionError(err.to_string())
    }
}
