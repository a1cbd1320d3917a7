//! Domain aggregates exposed by the customer service layer.

pub mod customer;
pub mod types;
pub mod vehicle;
