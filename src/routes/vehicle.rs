use actix_web::{HttpResponse, get, web};

use crate::context::RequestContext;
use crate::dto::response::Response;
use crate::dto::vehicle::VehicleQuery;
use crate::routes::{error_response, respond};
use crate::services::vehicle::VehicleCatalogClient;

#[get("/vehicles")]
pub async fn list_vehicles(
    ctx: RequestContext,
    catalog: web::Data<VehicleCatalogClient>,
    web::Query(query): web::Query<VehicleQuery>,
) -> HttpResponse {
    match catalog.list_vehicles(&ctx, &query).await {
        Ok((vehicles, meta)) => respond(&ctx, Response::ok(vehicles).with_meta(Some(meta))),
        Err(err) => error_response(&ctx, &err),
    }
}
