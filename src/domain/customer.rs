use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Address, CustomerEmail, CustomerId, PhoneNumber, Username};

/// A persisted customer record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub username: Username,
    pub email: CustomerEmail,
    pub phone: PhoneNumber,
    pub address: Address,
    pub created_at: NaiveDateTime,
}

/// A validated customer awaiting insertion. Storage assigns `id` and `created_at`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewCustomer {
    pub username: Username,
    pub email: CustomerEmail,
    pub phone: PhoneNumber,
    pub address: Address,
}

impl NewCustomer {
    #[must_use]
    pub const fn new(
        username: Username,
        email: CustomerEmail,
        phone: PhoneNumber,
        address: Address,
    ) -> Self {
        Self {
            username,
            email,
            phone,
            address,
        }
    }
}

/// Replacement values for a customer's mutable fields.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UpdateCustomer {
    pub username: Username,
    pub email: CustomerEmail,
    pub phone: PhoneNumber,
    pub address: Address,
}

impl From<NewCustomer> for UpdateCustomer {
    fn from(customer: NewCustomer) -> Self {
        Self {
            username: customer.username,
            email: customer.email,
            phone: customer.phone,
            address: customer.address,
        }
    }
}
