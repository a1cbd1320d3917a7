#![allow(dead_code)]

use std::path::Path;

use customer_hub::db::{DbPool, establish_connection_pool};
use customer_hub::domain::customer::{Customer, NewCustomer};
use customer_hub::models::config::{ServerConfig, VehicleCatalogConfig};
use customer_hub::repository::{CustomerWriter, DieselRepository};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// A migrated SQLite database living in a temporary directory.
/// Fields drop in order, so the pool closes before the directory goes.
pub struct TestDb {
    pool: DbPool,
    dir: TempDir,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let url = path.to_str().expect("utf-8 path").to_string();
        let pool = establish_connection_pool(&url).expect("build pool");
        let mut conn = pool.get().expect("get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");
        Self { pool, dir }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

pub fn new_customer(username: &str) -> NewCustomer {
    NewCustomer::new(
        username.try_into().expect("username"),
        format!("{username}@example.com").try_into().expect("email"),
        "0811".try_into().expect("phone"),
        "Jakarta".try_into().expect("address"),
    )
}

pub fn seed(repo: &DieselRepository, count: usize) -> Vec<Customer> {
    (1..=count)
        .map(|i| {
            repo.create_customer(&new_customer(&format!("user{i:02}")))
                .expect("seed customer")
        })
        .collect()
}

pub fn server_config(export_dir: &Path, catalog_url: &str) -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        request_timeout_secs: 30,
        export_dir: Some(export_dir.to_path_buf()),
        vehicle_catalog: VehicleCatalogConfig {
            base_url: catalog_url.to_string(),
            customer_id: "C220010001".to_string(),
            timeout_secs: 5,
        },
    }
}
