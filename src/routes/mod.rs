//! HTTP handlers and the helpers that render the response envelope.

use actix_multipart::MultipartError;
use actix_multipart::form::MultipartFormConfig;
use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use serde::Serialize;

use crate::context::{RequestContext, TraceId};
use crate::dto::response::Response;
use crate::forms::FieldErrors;
use crate::services::ServiceError;

pub mod customer;
pub mod vehicle;

/// Upload size accepted by `POST /customers/import`.
const MULTIPART_TOTAL_LIMIT: usize = 10 * 1024 * 1024;

/// Serializes `response` with its trace id and matching HTTP status.
pub fn respond<T: Serialize>(ctx: &RequestContext, response: Response<T>) -> HttpResponse {
    let response = response.finish(ctx);
    let status = StatusCode::from_u16(response.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(response)
}

/// Renders a service failure as an error envelope.
pub fn error_response(ctx: &RequestContext, err: &ServiceError) -> HttpResponse {
    if err.http_status() >= 500 {
        log::error!(
            "Request {} failed: {err}",
            ctx.trace_id().unwrap_or("-")
        );
    } else {
        log::debug!(
            "Request {} rejected: {err}",
            ctx.trace_id().unwrap_or("-")
        );
    }
    respond(ctx, Response::from_error(err))
}

/// Error envelope for payloads the framework could not decode.
fn decode_error(req: &HttpRequest, field: &str, message: String) -> HttpResponse {
    let err = ServiceError::Validation(FieldErrors::single(field, message));
    let mut response = Response::from_error(&err);
    if let Some(trace_id) = req.extensions().get::<TraceId>() {
        response.trace_id.clone_from(&trace_id.0);
    }
    HttpResponse::BadRequest().json(response)
}

fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let response = decode_error(req, "body", err.to_string());
    InternalError::from_response(err, response).into()
}

fn query_error(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    let response = decode_error(req, "query", err.to_string());
    InternalError::from_response(err, response).into()
}

fn path_error(err: PathError, req: &HttpRequest) -> actix_web::Error {
    let response = decode_error(req, "id", err.to_string());
    InternalError::from_response(err, response).into()
}

fn multipart_error(err: MultipartError, req: &HttpRequest) -> actix_web::Error {
    let response = decode_error(req, "file", err.to_string());
    InternalError::from_response(err, response).into()
}

/// Registers every endpoint under `/api/v1` along with extractor error
/// handlers that answer in the standard envelope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .app_data(web::QueryConfig::default().error_handler(query_error))
            .app_data(web::PathConfig::default().error_handler(path_error))
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(MULTIPART_TOTAL_LIMIT)
                    .error_handler(multipart_error),
            )
            .service(customer::export_customers)
            .service(customer::import_customers)
            .service(customer::create_customers_batch)
            .service(customer::delete_customers_batch)
            .service(customer::list_customers)
            .service(customer::create_customer)
            .service(customer::get_customer)
            .service(customer::update_customer)
            .service(vehicle::list_vehicles),
    );
}
