//! Multi-record create and delete.
//!
//! Writes are issued one record at a time, in request order. They are not
//! wrapped in a transaction: when a write fails or the deadline passes
//! mid-batch, the records already written stay written and the error names
//! the element that failed.

use std::collections::HashSet;

use crate::context::RequestContext;
use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::types::CustomerId;
use crate::dto::customer::BatchDeleteReport;
use crate::forms::FieldErrors;
use crate::forms::customer::CreateCustomerRequest;
use crate::repository::CustomerWriter;
use crate::services::{ServiceError, ServiceResult};

/// Persists `customers` in order, labelling a failure with `label(index)`.
pub(crate) fn persist_all<R>(
    repo: &R,
    ctx: &RequestContext,
    customers: &[NewCustomer],
    label: impl Fn(usize) -> String,
) -> ServiceResult<Vec<Customer>>
where
    R: CustomerWriter + ?Sized,
{
    let mut created = Vec::with_capacity(customers.len());
    for (index, new_customer) in customers.iter().enumerate() {
        if let Err(err) = ctx.check_deadline() {
            log::warn!(
                "Deadline reached after storing {} of {} customers",
                created.len(),
                customers.len()
            );
            return Err(err);
        }
        match repo.create_customer(new_customer) {
            Ok(customer) => created.push(customer),
            Err(err) => {
                log::error!(
                    "Failed to store {} after {} successful writes: {err}",
                    label(index),
                    created.len()
                );
                return Err(match ServiceError::from(err) {
                    ServiceError::Validation(errors) => {
                        ServiceError::Validation(errors.prefixed(&label(index)))
                    }
                    ServiceError::Storage(message) => {
                        ServiceError::Storage(format!("{}: {message}", label(index)))
                    }
                    other => other,
                });
            }
        }
    }
    Ok(created)
}

/// Validates every element up front; nothing is written unless all pass.
///
/// The first invalid element is reported with its fields qualified as
/// `customers[i].field`.
pub fn create_customers<R>(
    repo: &R,
    ctx: &RequestContext,
    requests: Vec<CreateCustomerRequest>,
) -> ServiceResult<Vec<Customer>>
where
    R: CustomerWriter + ?Sized,
{
    if requests.is_empty() {
        return Err(ServiceError::Validation(FieldErrors::single(
            "customers",
            "customers must not be empty",
        )));
    }

    let customers = requests
        .into_iter()
        .enumerate()
        .map(|(index, request)| {
            request
                .into_new_customer()
                .map_err(|errors| ServiceError::Validation(errors.prefixed(&element(index))))
        })
        .collect::<ServiceResult<Vec<_>>>()?;

    let created = persist_all(repo, ctx, &customers, element)?;
    log::info!("Created {} customers in batch", created.len());
    Ok(created)
}

fn element(index: usize) -> String {
    format!("customers[{index}]")
}

/// Parses and de-duplicates ids, keeping first-occurrence order.
fn distinct_ids(raw: &[i32]) -> ServiceResult<Vec<CustomerId>> {
    if raw.is_empty() {
        return Err(ServiceError::Validation(FieldErrors::single(
            "id",
            "id must not be empty",
        )));
    }

    let mut errors = FieldErrors::new();
    let mut seen = HashSet::with_capacity(raw.len());
    let mut ids = Vec::with_capacity(raw.len());
    for (index, value) in raw.iter().copied().enumerate() {
        match CustomerId::new(value) {
            Ok(id) => {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
            Err(_) => errors.insert(format!("id[{index}]"), "id must be greater than zero"),
        }
    }

    if errors.is_empty() {
        Ok(ids)
    } else {
        Err(ServiceError::Validation(errors))
    }
}

/// Deletes every listed id. Ids that do not exist are reported, not failed,
/// so repeating a request is harmless.
pub fn delete_customers<R>(
    repo: &R,
    ctx: &RequestContext,
    raw_ids: &[i32],
) -> ServiceResult<BatchDeleteReport>
where
    R: CustomerWriter + ?Sized,
{
    let ids = distinct_ids(raw_ids)?;
    let mut report = BatchDeleteReport {
        requested: ids.len(),
        ..BatchDeleteReport::default()
    };

    for id in ids {
        ctx.check_deadline()?;
        if repo.delete_customer(id)? {
            report.deleted += 1;
        } else {
            report.missing.push(id.get());
        }
    }

    log::info!(
        "Deleted {} of {} customers ({} missing)",
        report.deleted,
        report.requested,
        report.missing.len()
    );
    Ok(report)
}
