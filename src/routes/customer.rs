use actix_multipart::form::MultipartForm;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::context::RequestContext;
use crate::dto::customer::{BatchCreateReport, CustomerResponse};
use crate::dto::response::Response;
use crate::forms::customer::{
    BatchCreateRequest, BatchDeleteRequest, CreateCustomerRequest, UpdateCustomerRequest,
};
use crate::forms::filter::CustomerQueryFilter;
use crate::forms::upload::UploadCustomersForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{error_response, respond};
use crate::services;
use crate::services::export::XLSX_CONTENT_TYPE;

#[get("/customers")]
pub async fn list_customers(
    ctx: RequestContext,
    repo: web::Data<DieselRepository>,
    web::Query(filter): web::Query<CustomerQueryFilter>,
) -> HttpResponse {
    let result = ctx
        .run_blocking(move || services::customer::list_customers(repo.get_ref(), &filter))
        .await;

    match result {
        Ok(page) => {
            let customers: Vec<CustomerResponse> =
                page.customers.into_iter().map(Into::into).collect();
            respond(&ctx, Response::ok(customers).with_meta(page.meta))
        }
        Err(err) => error_response(&ctx, &err),
    }
}

#[get("/customers/export")]
pub async fn export_customers(
    ctx: RequestContext,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Query(filter): web::Query<CustomerQueryFilter>,
) -> HttpResponse {
    let export_dir = server_config.export_dir();
    let task_ctx = ctx.clone();
    let result = ctx
        .run_blocking(move || {
            let artifact = services::export::export_customers(
                repo.get_ref(),
                &task_ctx,
                &filter,
                &export_dir,
            )?;
            let file_name = artifact.file_name().to_string();
            Ok((file_name, artifact.into_bytes()?))
        })
        .await;

    match result {
        Ok((file_name, bytes)) => HttpResponse::Ok()
            .content_type(XLSX_CONTENT_TYPE)
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(file_name)],
            })
            .body(bytes),
        Err(err) => error_response(&ctx, &err),
    }
}

#[post("/customers/import")]
pub async fn import_customers(
    ctx: RequestContext,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadCustomersForm>,
) -> HttpResponse {
    let task_ctx = ctx.clone();
    let result = ctx
        .run_blocking(move || {
            let file_name = form.file.file_name.unwrap_or_default();
            services::import::import_customers(
                repo.get_ref(),
                &task_ctx,
                &file_name,
                form.file.file,
            )
        })
        .await;

    match result {
        Ok(report) => respond(
            &ctx,
            Response::ok(report).with_message("Import Successful"),
        ),
        Err(err) => error_response(&ctx, &err),
    }
}

#[post("/customers/batch")]
pub async fn create_customers_batch(
    ctx: RequestContext,
    repo: web::Data<DieselRepository>,
    web::Json(payload): web::Json<BatchCreateRequest>,
) -> HttpResponse {
    let task_ctx = ctx.clone();
    let result = ctx
        .run_blocking(move || {
            services::batch::create_customers(repo.get_ref(), &task_ctx, payload.customers)
        })
        .await;

    match result {
        Ok(created) => {
            let report = BatchCreateReport {
                created: created.into_iter().map(Into::into).collect(),
            };
            respond(
                &ctx,
                Response::created(report).with_message("Created Batch Successful"),
            )
        }
        Err(err) => error_response(&ctx, &err),
    }
}

#[delete("/customers/batch")]
pub async fn delete_customers_batch(
    ctx: RequestContext,
    repo: web::Data<DieselRepository>,
    web::Json(payload): web::Json<BatchDeleteRequest>,
) -> HttpResponse {
    let task_ctx = ctx.clone();
    let result = ctx
        .run_blocking(move || {
            services::batch::delete_customers(repo.get_ref(), &task_ctx, &payload.ids)
        })
        .await;

    match result {
        Ok(report) => respond(
            &ctx,
            Response::ok(report).with_message("Delete Batch Successful"),
        ),
        Err(err) => error_response(&ctx, &err),
    }
}

#[post("/customers")]
pub async fn create_customer(
    ctx: RequestContext,
    repo: web::Data<DieselRepository>,
    web::Json(payload): web::Json<CreateCustomerRequest>,
) -> HttpResponse {
    let result = ctx
        .run_blocking(move || services::customer::create_customer(repo.get_ref(), payload))
        .await;

    match result {
        Ok(customer) => respond(
            &ctx,
            Response::created(CustomerResponse::from(customer)).with_message("Created Successful"),
        ),
        Err(err) => error_response(&ctx, &err),
    }
}

#[get("/customers/{id}")]
pub async fn get_customer(
    ctx: RequestContext,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> HttpResponse {
    let raw_id = path.into_inner();
    let result = ctx
        .run_blocking(move || {
            let id = services::customer::parse_customer_id(raw_id)?;
            services::customer::get_customer(repo.get_ref(), id)
        })
        .await;

    match result {
        Ok(customer) => respond(&ctx, Response::ok(CustomerResponse::from(customer))),
        Err(err) => error_response(&ctx, &err),
    }
}

#[patch("/customers/{id}")]
pub async fn update_customer(
    ctx: RequestContext,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    web::Json(payload): web::Json<UpdateCustomerRequest>,
) -> HttpResponse {
    let raw_id = path.into_inner();
    let result = ctx
        .run_blocking(move || {
            let id = services::customer::parse_customer_id(raw_id)?;
            services::customer::update_customer(repo.get_ref(), id, payload)
        })
        .await;

    match result {
        Ok(customer) => respond(
            &ctx,
            Response::ok(CustomerResponse::from(customer)).with_message("Update Successful"),
        ),
        Err(err) => error_response(&ctx, &err),
    }
}
