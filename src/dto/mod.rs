//! DTOs exchanged over the HTTP API.

pub mod customer;
pub mod response;
pub mod vehicle;
