//! DTOs for the vehicle catalog proxy.

use serde::Deserialize;

use crate::pagination::PageRequest;

/// Query parameters of `GET /vehicles`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleQuery {
    /// Free-text search forwarded to the catalog.
    pub q: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
    /// `1` lists active vehicles only; defaults to `0`.
    pub is_active: Option<u8>,
}

impl VehicleQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    pub fn is_active(&self) -> u8 {
        self.is_active.unwrap_or_default()
    }

    pub fn search(&self) -> &str {
        self.q.as_deref().map_or("", str::trim)
    }
}
