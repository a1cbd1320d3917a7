//! Read-only proxy to the external vehicle catalog.

use std::time::Duration;

use serde::Deserialize;

use crate::context::RequestContext;
use crate::domain::vehicle::{Vehicle, null_as_default};
use crate::dto::vehicle::VehicleQuery;
use crate::models::config::VehicleCatalogConfig;
use crate::pagination::Meta;
use crate::services::{ServiceError, ServiceResult};

const VEHICLES_PATH: &str = "/master/v1/vehicles";
const CUSTOMER_HEADER: &str = "cust_id";

/// Paging block as reported by the catalog. Absent or `null` counters read
/// as zero.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogPaging {
    #[serde(deserialize_with = "null_as_default")]
    total_record: usize,
    #[serde(deserialize_with = "null_as_default")]
    page_current: usize,
    #[serde(deserialize_with = "null_as_default")]
    page_limit: usize,
    #[serde(deserialize_with = "null_as_default")]
    page_total: usize,
}

impl From<CatalogPaging> for Meta {
    fn from(paging: CatalogPaging) -> Self {
        Self {
            total_data: paging.total_record,
            page: paging.page_current,
            limit: paging.page_limit,
            total_page: paging.page_total,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    data: Option<Vec<Vehicle>>,
    #[serde(default, deserialize_with = "null_as_default")]
    paging: CatalogPaging,
}

/// HTTP client for the catalog's vehicle listing.
#[derive(Debug, Clone)]
pub struct VehicleCatalogClient {
    http: reqwest::Client,
    base_url: String,
    customer_id: String,
    timeout: Duration,
}

impl VehicleCatalogClient {
    pub fn new(config: &VehicleCatalogConfig) -> ServiceResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| ServiceError::Internal(format!("failed to build catalog client: {err}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            customer_id: config.customer_id.clone(),
            timeout: config.timeout(),
        })
    }

    /// Lists one page of vehicles. The catalog's paging block is passed
    /// through unchanged as [`Meta`].
    ///
    /// The call is bounded by the shorter of the client timeout and the
    /// request's remaining budget. Failures are not retried.
    pub async fn list_vehicles(
        &self,
        ctx: &RequestContext,
        query: &VehicleQuery,
    ) -> ServiceResult<(Vec<Vehicle>, Meta)> {
        let remaining = ctx.remaining().ok_or(ServiceError::Timeout)?;
        let page = query.page_request();
        let url = format!("{}{VEHICLES_PATH}", self.base_url);
        log::debug!(
            "Fetching vehicles page {} (limit {}) from {url}",
            page.page(),
            page.limit()
        );

        let response = self
            .http
            .get(&url)
            .header(CUSTOMER_HEADER, &self.customer_id)
            .query(&[
                ("q", query.search().to_string()),
                ("page", page.page().to_string()),
                ("limit", page.limit().to_string()),
                ("is_active", query.is_active().to_string()),
            ])
            .timeout(self.timeout.min(remaining))
            .send()
            .await
            .map_err(|err| self.transport_error(ctx, &err))?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Vehicle catalog answered {status}");
            return Err(ServiceError::Upstream(format!(
                "vehicle catalog returned {status}"
            )));
        }

        let body: CatalogResponse = response
            .json()
            .await
            .map_err(|err| self.transport_error(ctx, &err))?;

        Ok((body.data.unwrap_or_default(), body.paging.into()))
    }

    fn transport_error(&self, ctx: &RequestContext, err: &reqwest::Error) -> ServiceError {
        if err.is_timeout() && ctx.remaining().is_none() {
            log::error!("Vehicle catalog call outlived the request deadline");
            return ServiceError::Timeout;
        }
        log::error!("Vehicle catalog call to {} failed: {err}", self.base_url);
        ServiceError::Upstream(format!("vehicle catalog request failed: {err}"))
    }
}
