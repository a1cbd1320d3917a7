use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;

use crate::db::{DbConnection, DbPool, get_connection};
use crate::domain::customer::{Customer, NewCustomer, UpdateCustomer};
use crate::domain::types::CustomerId;
use crate::pagination::PageRequest;
use crate::repository::errors::RepositoryResult;

pub mod customer;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

/// Columns a customer listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    Username,
    Email,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Ordering for a customer listing, parsed from keys such as `username`
/// (ascending) or `-created_at` (descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CustomerSort {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Returned when a sort key names no sortable column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortKey(pub String);

impl Display for UnknownSortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown sort key `{}`", self.0)
    }
}

impl FromStr for CustomerSort {
    type Err = UnknownSortKey;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let trimmed = key.trim();
        let (direction, column) = match trimmed.strip_prefix('-') {
            Some(column) => (SortDirection::Desc, column),
            None => (SortDirection::Asc, trimmed),
        };
        let field = match column {
            "id" => SortField::Id,
            "username" => SortField::Username,
            "email" => SortField::Email,
            "created_at" => SortField::CreatedAt,
            _ => return Err(UnknownSortKey(key.to_string())),
        };
        Ok(Self { field, direction })
    }
}

/// Filter, ordering and paging consumed by [`CustomerReader::list_customers`].
///
/// `pagination == None` returns every matching record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerListQuery {
    pub username: Option<String>,
    pub email: Option<String>,
    /// Inclusive lower bound on the creation date.
    pub created_from: Option<NaiveDate>,
    /// Inclusive upper bound on the creation date.
    pub created_to: Option<NaiveDate>,
    pub sort: CustomerSort,
    pub pagination: Option<PageRequest>,
}

impl CustomerListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn created_between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.created_from = from;
        self.created_to = to;
        self
    }

    pub fn sort(mut self, sort: CustomerSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn paginate(mut self, page: PageRequest) -> Self {
        self.pagination = Some(page);
        self
    }
}

pub trait CustomerReader {
    fn get_customer_by_id(&self, id: CustomerId) -> RepositoryResult<Option<Customer>>;
    /// Returns the total number of matches and the requested page of them.
    fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
}

pub trait CustomerWriter {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
    fn update_customer(
        &self,
        id: CustomerId,
        updates: &UpdateCustomer,
    ) -> RepositoryResult<Option<Customer>>;
    /// Returns `true` when a row was removed, `false` when `id` was absent.
    fn delete_customer(&self, id: CustomerId) -> RepositoryResult<bool>;
}

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}
