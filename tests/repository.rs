use chrono::{Days, Utc};
use customer_hub::domain::customer::UpdateCustomer;
use customer_hub::domain::types::CustomerId;
use customer_hub::pagination::PageRequest;
use customer_hub::repository::{
    CustomerListQuery, CustomerReader, CustomerSort, CustomerWriter, SortDirection, SortField,
};

mod common;

use common::{TestDb, new_customer, seed};

#[test]
fn test_customer_repository_crud() {
    let test_db = TestDb::new("test_customer_repository_crud.db");
    let repo = test_db.repo();

    let created = repo.create_customer(&new_customer("alice")).unwrap();
    assert!(created.id.get() > 0);
    assert_eq!(created.email.as_str(), "alice@example.com");

    let fetched = repo.get_customer_by_id(created.id).unwrap().unwrap();
    assert_eq!(fetched, created);

    let updates = UpdateCustomer::from(new_customer("alicia"));
    let updated = repo
        .update_customer(created.id, &updates)
        .unwrap()
        .unwrap();
    assert_eq!(updated.username.as_str(), "alicia");
    assert_eq!(updated.created_at, created.created_at);

    assert!(repo.delete_customer(created.id).unwrap());
    assert!(!repo.delete_customer(created.id).unwrap());
    assert!(repo.get_customer_by_id(created.id).unwrap().is_none());
}

#[test]
fn test_update_of_missing_customer_returns_none() {
    let test_db = TestDb::new("test_update_of_missing_customer_returns_none.db");
    let repo = test_db.repo();

    let updates = UpdateCustomer::from(new_customer("ghost"));
    let missing = CustomerId::new(404).unwrap();

    assert!(repo.update_customer(missing, &updates).unwrap().is_none());
}

#[test]
fn test_list_paginates_and_counts_all_matches() {
    let test_db = TestDb::new("test_list_paginates_and_counts_all_matches.db");
    let repo = test_db.repo();
    seed(&repo, 25);

    let (total, page) = repo
        .list_customers(CustomerListQuery::new().paginate(PageRequest::new(Some(3), Some(10))))
        .unwrap();
    assert_eq!(total, 25);
    assert_eq!(page.len(), 5);
    assert_eq!(page[0].username.as_str(), "user21");

    let (total, everything) = repo.list_customers(CustomerListQuery::new()).unwrap();
    assert_eq!(total, 25);
    assert_eq!(everything.len(), 25);
}

#[test]
fn test_list_filters_and_sorts() {
    let test_db = TestDb::new("test_list_filters_and_sorts.db");
    let repo = test_db.repo();
    seed(&repo, 12);

    let (total, items) = repo
        .list_customers(
            CustomerListQuery::new()
                .username("user1")
                .sort(CustomerSort {
                    field: SortField::Username,
                    direction: SortDirection::Desc,
                }),
        )
        .unwrap();
    assert_eq!(total, 3);
    let names: Vec<&str> = items.iter().map(|c| c.username.as_str()).collect();
    assert_eq!(names, vec!["user12", "user11", "user10"]);

    let (total, _) = repo
        .list_customers(CustomerListQuery::new().email("user05@"))
        .unwrap();
    assert_eq!(total, 1);
}

#[test]
fn test_list_filters_by_creation_date() {
    let test_db = TestDb::new("test_list_filters_by_creation_date.db");
    let repo = test_db.repo();
    seed(&repo, 4);

    let today = Utc::now().date_naive();
    let (total, _) = repo
        .list_customers(CustomerListQuery::new().created_between(Some(today), Some(today)))
        .unwrap();
    assert_eq!(total, 4);

    let last_week = today.checked_sub_days(Days::new(7)).unwrap();
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap();
    let (total, items) = repo
        .list_customers(CustomerListQuery::new().created_between(Some(last_week), Some(yesterday)))
        .unwrap();
    assert_eq!(total, 0);
    assert!(items.is_empty());
}

#[test]
fn test_list_filters_treat_wildcards_literally() {
    let test_db = TestDb::new("test_list_filters_treat_wildcards_literally.db");
    let repo = test_db.repo();
    repo.create_customer(&new_customer("axb")).unwrap();
    repo.create_customer(&new_customer("a_b")).unwrap();

    let (total, items) = repo
        .list_customers(CustomerListQuery::new().username("a_b"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].username.as_str(), "a_b");

    let (total, _) = repo
        .list_customers(CustomerListQuery::new().email("a_b@"))
        .unwrap();
    assert_eq!(total, 1);

    let (total, _) = repo
        .list_customers(CustomerListQuery::new().username("%"))
        .unwrap();
    assert_eq!(total, 0);
}
