use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::customer::{
    Customer as DomainCustomer, NewCustomer as DomainNewCustomer,
    UpdateCustomer as DomainUpdateCustomer,
};
use crate::domain::types::{
    Address, CustomerEmail, CustomerId, PhoneNumber, TypeConstraintError, Username,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::customers)]
/// Diesel model for [`crate::domain::customer::Customer`].
pub struct Customer {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customers)]
/// Insertable form of [`Customer`].
pub struct NewCustomer<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::customers)]
/// Data used when updating a [`Customer`] record.
pub struct UpdateCustomer<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
}

impl TryFrom<Customer> for DomainCustomer {
    type Error = TypeConstraintError;

    fn try_from(customer: Customer) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CustomerId::new(customer.id)?,
            username: Username::new(customer.username)?,
            email: CustomerEmail::new(customer.email)?,
            phone: PhoneNumber::new(customer.phone)?,
            address: Address::new(customer.address)?,
            created_at: customer.created_at,
        })
    }
}

impl<'a> NewCustomer<'a> {
    /// Borrows the domain value, stamping it with the insertion time.
    pub fn from_domain(customer: &'a DomainNewCustomer, created_at: NaiveDateTime) -> Self {
        Self {
            username: customer.username.as_str(),
            email: customer.email.as_str(),
            phone: customer.phone.as_str(),
            address: customer.address.as_str(),
            created_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateCustomer> for UpdateCustomer<'a> {
    fn from(customer: &'a DomainUpdateCustomer) -> Self {
        Self {
            username: customer.username.as_str(),
            email: customer.email.as_str(),
            phone: customer.phone.as_str(),
            address: customer.address.as_str(),
        }
    }
}
