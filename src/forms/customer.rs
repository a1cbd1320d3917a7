use serde::Deserialize;
use validator::Validate;

use crate::domain::customer::{NewCustomer, UpdateCustomer};
use crate::domain::types::{
    Address, CustomerEmail, PhoneNumber, TypeConstraintError, Username,
};
use crate::forms::FieldErrors;

/// Payload for creating a single customer. Also the shape of one imported
/// spreadsheet row and of each element of a batch create.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "email is required"),
        email(message = "email is not a valid address")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
}

/// Payload of `PATCH /customers/{id}`; every field is replaced.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "email is required"),
        email(message = "email is not a valid address")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
}

/// Payload of `POST /customers/batch`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchCreateRequest {
    #[serde(default)]
    pub customers: Vec<CreateCustomerRequest>,
}

/// Payload of `DELETE /customers/batch`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchDeleteRequest {
    #[serde(default, rename = "id")]
    pub ids: Vec<i32>,
}

fn constraint_message(field: &str, err: &TypeConstraintError) -> String {
    match err {
        TypeConstraintError::EmptyString => format!("{field} is required"),
        TypeConstraintError::InvalidEmail => format!("{field} is not a valid address"),
        TypeConstraintError::NonPositiveId => format!("{field} must be greater than zero"),
    }
}

fn checked<T>(
    errors: &mut FieldErrors,
    field: &str,
    value: Result<T, TypeConstraintError>,
) -> Option<T> {
    value
        .map_err(|err| errors.insert(field, constraint_message(field, &err)))
        .ok()
}

/// Converts raw fields into domain values, collecting one message per field.
fn customer_fields(
    username: String,
    email: String,
    phone: String,
    address: String,
) -> Result<NewCustomer, FieldErrors> {
    let mut errors = FieldErrors::new();
    let username = checked(&mut errors, "username", Username::new(username));
    let email = checked(&mut errors, "email", CustomerEmail::new(email));
    let phone = checked(&mut errors, "phone", PhoneNumber::new(phone));
    let address = checked(&mut errors, "address", Address::new(address));

    match (username, email, phone, address) {
        (Some(username), Some(email), Some(phone), Some(address)) => {
            Ok(NewCustomer::new(username, email, phone, address))
        }
        _ => Err(errors),
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

impl CreateCustomerRequest {
    /// Validates the payload and converts it into a [`NewCustomer`].
    /// Fields are trimmed before any rule runs.
    pub fn into_new_customer(mut self) -> Result<NewCustomer, FieldErrors> {
        for field in [
            &mut self.username,
            &mut self.email,
            &mut self.phone,
            &mut self.address,
        ] {
            trim_in_place(field);
        }
        if let Err(errors) = self.validate() {
            return Err(FieldErrors::from(&errors));
        }
        customer_fields(self.username, self.email, self.phone, self.address)
    }
}

impl UpdateCustomerRequest {
    /// Validates the payload and converts it into an [`UpdateCustomer`].
    pub fn into_update_customer(mut self) -> Result<UpdateCustomer, FieldErrors> {
        for field in [
            &mut self.username,
            &mut self.email,
            &mut self.phone,
            &mut self.address,
        ] {
            trim_in_place(field);
        }
        if let Err(errors) = self.validate() {
            return Err(FieldErrors::from(&errors));
        }
        customer_fields(self.username, self.email, self.phone, self.address)
            .map(UpdateCustomer::from)
    }
}
