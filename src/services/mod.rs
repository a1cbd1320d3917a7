//! Business operations behind the HTTP routes.
//!
//! Services are synchronous and generic over the repository traits so they
//! can run on the blocking pool and be exercised against mocks.

use thiserror::Error;

use crate::forms::FieldErrors;
use crate::forms::filter::FilterError;

pub mod batch;
pub mod customer;
pub mod export;
pub mod import;
pub mod vehicle;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("invalid filter: {0}")]
    InvalidFilter(#[from] FilterError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidFileType(String),

    #[error("failed to parse spreadsheet: {0}")]
    Parse(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("request deadline exceeded")]
    Timeout,

    #[error("export failed: {0}")]
    Export(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Stable error kind reported in the response envelope.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidFilter(err) => err.code(),
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidFileType(_) => "INVALID_FILE_TYPE",
            Self::Parse(_) => "PARSE_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Upstream(_) => "UPSTREAM_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Export(_) => "EXPORT_ERROR",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_)
            | Self::InvalidFilter(_)
            | Self::InvalidFileType(_)
            | Self::Parse(_) => 400,
            Self::NotFound(_) => 404,
            Self::Storage(_)
            | Self::Upstream(_)
            | Self::Timeout
            | Self::Export(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Field-level details, when the failure has them.
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors.clone()),
            Self::InvalidFilter(err) => Some(FieldErrors::from(err)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        for err in [
            ServiceError::Validation(FieldErrors::single("email", "email is required")),
            ServiceError::InvalidFilter(FilterError::InvalidRange),
            ServiceError::InvalidFileType(".csv".into()),
            ServiceError::Parse("bad zip".into()),
        ] {
            assert_eq!(err.http_status(), 400, "{}", err.kind());
        }
        assert_eq!(ServiceError::NotFound("gone".into()).http_status(), 404);
    }

    #[test]
    fn server_errors_map_to_500() {
        for err in [
            ServiceError::Storage("locked".into()),
            ServiceError::Upstream("502".into()),
            ServiceError::Timeout,
            ServiceError::Export("disk full".into()),
            ServiceError::Internal("join".into()),
        ] {
            assert_eq!(err.http_status(), 500, "{}", err.kind());
        }
    }

    #[test]
    fn filter_errors_keep_their_own_kind() {
        let err = ServiceError::from(FilterError::InvalidSortKey("x".into()));
        assert_eq!(err.kind(), "INVALID_SORT_KEY");
        assert_eq!(err.field_errors().unwrap().get("sort"), Some("unknown sort key `x`"));
    }
}
