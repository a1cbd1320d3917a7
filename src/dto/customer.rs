//! DTOs returned by the customer endpoints.

use serde::Serialize;

use crate::domain::customer::Customer;
use crate::forms::FieldErrors;

const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Customer as rendered in JSON responses.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CustomerResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: String,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id.get(),
            username: customer.username.into_inner(),
            email: customer.email.into_inner(),
            phone: customer.phone.into_inner(),
            address: customer.address.into_inner(),
            created_at: customer.created_at.format(CREATED_AT_FORMAT).to_string(),
        }
    }
}

/// Outcome of `POST /customers/batch`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchCreateReport {
    pub created: Vec<CustomerResponse>,
}

/// Outcome of `DELETE /customers/batch`.
///
/// `requested` counts distinct ids; ids that matched nothing are listed in
/// `missing`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BatchDeleteReport {
    pub requested: usize,
    pub deleted: usize,
    pub missing: Vec<i32>,
}

/// A spreadsheet row that was not imported.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RowFailure {
    /// 1-based data row number, the header excluded.
    pub row: usize,
    pub errors: FieldErrors,
}

/// Outcome of `POST /customers/import`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub failed: Vec<RowFailure>,
}
