use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::forms::FieldErrors;
use crate::pagination::PageRequest;
use crate::repository::{CustomerListQuery, CustomerSort};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Query parameters shared by `GET /customers` and `GET /customers/export`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerQueryFilter {
    /// `"true"` returns every match without pagination.
    pub all: Option<String>,
    pub limit: Option<usize>,
    pub page: Option<usize>,
    pub username: Option<String>,
    pub email: Option<String>,
    /// `YYYY-MM-DD`, inclusive.
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`, inclusive.
    pub end_date: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("start_date must not be after end_date")]
    InvalidRange,

    #[error("unknown sort key `{0}`")]
    InvalidSortKey(String),

    #[error("{field} must be a date formatted as YYYY-MM-DD")]
    InvalidDate { field: &'static str },

    #[error("all must be either true or false")]
    InvalidAllFlag,
}

impl FilterError {
    /// Machine-readable code reported to clients.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRange => "INVALID_RANGE",
            Self::InvalidSortKey(_) => "INVALID_SORT_KEY",
            Self::InvalidDate { .. } | Self::InvalidAllFlag => "VALIDATION_ERROR",
        }
    }

    /// Query parameter the error refers to.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidRange => "start_date",
            Self::InvalidSortKey(_) => "sort",
            Self::InvalidDate { field } => *field,
            Self::InvalidAllFlag => "all",
        }
    }
}

impl From<&FilterError> for FieldErrors {
    fn from(err: &FilterError) -> Self {
        Self::single(err.field(), err.to_string())
    }
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|value| value.trim()).filter(|value| !value.is_empty())
}

fn parse_date(field: &'static str, value: Option<&String>) -> Result<Option<NaiveDate>, FilterError> {
    non_blank(value)
        .map(|raw| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| FilterError::InvalidDate { field })
        })
        .transpose()
}

impl CustomerQueryFilter {
    /// Normalized page/limit, defaulting to 1/10.
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    /// Whether pagination is bypassed. Absent means paginated.
    pub fn is_all(&self) -> Result<bool, FilterError> {
        match non_blank(self.all.as_ref()).map(str::to_ascii_lowercase).as_deref() {
            None | Some("false") => Ok(false),
            Some("true") => Ok(true),
            Some(_) => Err(FilterError::InvalidAllFlag),
        }
    }

    /// Validates the filter and converts it into a storage query.
    pub fn to_query(&self) -> Result<CustomerListQuery, FilterError> {
        let start = parse_date("start_date", self.start_date.as_ref())?;
        let end = parse_date("end_date", self.end_date.as_ref())?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(FilterError::InvalidRange);
            }
        }

        let sort = match non_blank(self.sort.as_ref()) {
            Some(key) => key
                .parse::<CustomerSort>()
                .map_err(|err| FilterError::InvalidSortKey(err.0))?,
            None => CustomerSort::default(),
        };

        let mut query = CustomerListQuery::new()
            .created_between(start, end)
            .sort(sort);
        if let Some(username) = non_blank(self.username.as_ref()) {
            query = query.username(username);
        }
        if let Some(email) = non_blank(self.email.as_ref()) {
            query = query.email(email);
        }
        if !self.is_all()? {
            query = query.paginate(self.page_request());
        }

        Ok(query)
    }
}
