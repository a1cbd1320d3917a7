//! Configuration model loaded from external sources.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CATALOG_CUSTOMER_ID: &str = "C220010001";

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Deadline applied to every inbound request and its downstream calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Directory for temporary export files. Defaults to the OS temp dir.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    pub vehicle_catalog: VehicleCatalogConfig,
}

#[derive(Clone, Debug, Deserialize)]
/// Connection settings for the third-party vehicle catalog.
pub struct VehicleCatalogConfig {
    pub base_url: String,
    /// Value sent in the `cust_id` header on every catalog call.
    #[serde(default = "default_catalog_customer_id")]
    pub customer_id: String,
    #[serde(default = "default_catalog_timeout_secs")]
    pub timeout_secs: u64,
}

impl ServerConfig {
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl VehicleCatalogConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

const fn default_catalog_timeout_secs() -> u64 {
    DEFAULT_CATALOG_TIMEOUT_SECS
}

fn default_catalog_customer_id() -> String {
    DEFAULT_CATALOG_CUSTOMER_ID.to_string()
}
