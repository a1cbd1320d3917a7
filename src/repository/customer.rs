use chrono::{NaiveTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::customer::{Customer, NewCustomer, UpdateCustomer};
use crate::domain::types::CustomerId;
use crate::models::customer::{
    Customer as DbCustomer, NewCustomer as DbNewCustomer, UpdateCustomer as DbUpdateCustomer,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CustomerListQuery, CustomerReader, CustomerSort, CustomerWriter, DieselRepository,
    SortDirection, SortField,
};
use crate::schema::customers;

const LIKE_ESCAPE: char = '\\';

/// Wraps `value` in `%` for a substring LIKE, escaping its own wildcards.
fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Builds the filtered (unordered, unpaginated) selection for `query`.
fn filtered(query: &CustomerListQuery) -> customers::BoxedQuery<'static, Sqlite> {
    let mut items = customers::table.into_boxed();

    if let Some(username) = &query.username {
        items = items.filter(
            customers::username
                .like(contains_pattern(username))
                .escape(LIKE_ESCAPE),
        );
    }
    if let Some(email) = &query.email {
        items = items.filter(
            customers::email
                .like(contains_pattern(email))
                .escape(LIKE_ESCAPE),
        );
    }
    if let Some(from) = query.created_from {
        items = items.filter(customers::created_at.ge(from.and_time(NaiveTime::MIN)));
    }
    // Whole-day inclusive upper bound: everything before the next midnight.
    if let Some(next_day) = query.created_to.and_then(|to| to.succ_opt()) {
        items = items.filter(customers::created_at.lt(next_day.and_time(NaiveTime::MIN)));
    }

    items
}

fn ordered(
    items: customers::BoxedQuery<'static, Sqlite>,
    sort: CustomerSort,
) -> customers::BoxedQuery<'static, Sqlite> {
    let items = match (sort.field, sort.direction) {
        (SortField::Id, SortDirection::Asc) => items.order(customers::id.asc()),
        (SortField::Id, SortDirection::Desc) => items.order(customers::id.desc()),
        (SortField::Username, SortDirection::Asc) => items.order(customers::username.asc()),
        (SortField::Username, SortDirection::Desc) => items.order(customers::username.desc()),
        (SortField::Email, SortDirection::Asc) => items.order(customers::email.asc()),
        (SortField::Email, SortDirection::Desc) => items.order(customers::email.desc()),
        (SortField::CreatedAt, SortDirection::Asc) => items.order(customers::created_at.asc()),
        (SortField::CreatedAt, SortDirection::Desc) => items.order(customers::created_at.desc()),
    };
    items.then_order_by(customers::id.asc())
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn into_domain(rows: Vec<DbCustomer>) -> RepositoryResult<Vec<Customer>> {
    rows.into_iter()
        .map(|row| Customer::try_from(row).map_err(RepositoryError::from))
        .collect()
}

impl CustomerReader for DieselRepository {
    fn get_customer_by_id(&self, id: CustomerId) -> RepositoryResult<Option<Customer>> {
        let mut conn = self.conn()?;
        let customer = customers::table
            .find(id.get())
            .select(DbCustomer::as_select())
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        customer
            .map(|row| Customer::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(&query).count().get_result(&mut conn)?;

        let mut items = ordered(filtered(&query), query.sort);
        if let Some(page) = query.pagination {
            items = items
                .limit(to_i64(page.limit()))
                .offset(to_i64(page.offset()));
        }
        let rows = items
            .select(DbCustomer::as_select())
            .load::<DbCustomer>(&mut conn)?;

        let total = usize::try_from(total).unwrap_or_default();
        Ok((total, into_domain(rows)?))
    }
}

impl CustomerWriter for DieselRepository {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer> {
        let mut conn = self.conn()?;
        let insertable = DbNewCustomer::from_domain(new_customer, Utc::now().naive_utc());

        let created = diesel::insert_into(customers::table)
            .values(&insertable)
            .returning(DbCustomer::as_returning())
            .get_result::<DbCustomer>(&mut conn)?;

        Ok(Customer::try_from(created)?)
    }

    fn update_customer(
        &self,
        id: CustomerId,
        updates: &UpdateCustomer,
    ) -> RepositoryResult<Option<Customer>> {
        let mut conn = self.conn()?;
        let changes: DbUpdateCustomer = updates.into();

        let updated = diesel::update(customers::table.find(id.get()))
            .set(&changes)
            .returning(DbCustomer::as_returning())
            .get_result::<DbCustomer>(&mut conn)
            .optional()?;

        updated
            .map(|row| Customer::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }

    fn delete_customer(&self, id: CustomerId) -> RepositoryResult<bool> {
        let mut conn = self.conn()?;
        let affected = diesel::delete(customers::table.find(id.get())).execute(&mut conn)?;
        Ok(affected > 0)
    }
}
