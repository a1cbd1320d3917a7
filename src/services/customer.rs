use crate::domain::customer::Customer;
use crate::domain::types::CustomerId;
use crate::forms::FieldErrors;
use crate::forms::customer::{CreateCustomerRequest, UpdateCustomerRequest};
use crate::forms::filter::CustomerQueryFilter;
use crate::pagination::Meta;
use crate::repository::{CustomerReader, CustomerWriter};
use crate::services::{ServiceError, ServiceResult};

/// A page of customers; `meta` is `None` when pagination was bypassed.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerPage {
    pub customers: Vec<Customer>,
    pub meta: Option<Meta>,
}

/// Parses a path id, rejecting non-positive values.
pub fn parse_customer_id(raw: i32) -> ServiceResult<CustomerId> {
    CustomerId::new(raw).map_err(|_| {
        ServiceError::Validation(FieldErrors::single("id", "id must be greater than zero"))
    })
}

fn not_found(id: CustomerId) -> ServiceError {
    ServiceError::NotFound(format!("customer {id} not found"))
}

/// Fetches one customer or fails with [`ServiceError::NotFound`].
pub fn get_customer<R>(repo: &R, id: CustomerId) -> ServiceResult<Customer>
where
    R: CustomerReader + ?Sized,
{
    repo.get_customer_by_id(id)?.ok_or_else(|| not_found(id))
}

/// Lists customers matching `filter`.
///
/// A page past the end of the result set is answered with the last page,
/// and `meta` reports that page.
pub fn list_customers<R>(repo: &R, filter: &CustomerQueryFilter) -> ServiceResult<CustomerPage>
where
    R: CustomerReader + ?Sized,
{
    let query = filter.to_query()?;
    let pagination = query.pagination;
    let (total, customers) = repo.list_customers(query.clone())?;

    let Some(page) = pagination else {
        return Ok(CustomerPage {
            customers,
            meta: None,
        });
    };

    if page.overshoots(total) {
        let last = page.last_page(total);
        log::debug!(
            "Page {} is past the last page {}, serving the last page",
            page.page(),
            last.page()
        );
        let (total, customers) = repo.list_customers(query.paginate(last))?;
        return Ok(CustomerPage {
            customers,
            meta: Some(Meta::new(last, total)),
        });
    }

    Ok(CustomerPage {
        customers,
        meta: Some(Meta::new(page, total)),
    })
}

/// Validates and persists a single customer.
pub fn create_customer<R>(repo: &R, request: CreateCustomerRequest) -> ServiceResult<Customer>
where
    R: CustomerWriter + ?Sized,
{
    let new_customer = request
        .into_new_customer()
        .map_err(ServiceError::Validation)?;
    let customer = repo.create_customer(&new_customer)?;
    log::info!("Created customer {}", customer.id);
    Ok(customer)
}

/// Replaces every mutable field of an existing customer.
pub fn update_customer<R>(
    repo: &R,
    id: CustomerId,
    request: UpdateCustomerRequest,
) -> ServiceResult<Customer>
where
    R: CustomerWriter + ?Sized,
{
    let updates = request
        .into_update_customer()
        .map_err(ServiceError::Validation)?;
    repo.update_customer(id, &updates)?
        .ok_or_else(|| not_found(id))
}
