use actix_cors::Cors;
use actix_web::middleware::{Compress, Logger};
use actix_web::{App, HttpServer, web};

use crate::db::establish_connection_pool;
use crate::middleware::RequestIdMiddleware;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::services::vehicle::VehicleCatalogClient;

pub mod context;
pub mod db;
pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

pub use crate::routes::configure;

/// Access log format; `%{x-request-id}o` is the trace id echoed on the response.
const ACCESS_LOG_FORMAT: &str = r#"%a "%r" %s %b %{x-request-id}o %Dms"#;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    let catalog = VehicleCatalogClient::new(&server_config.vehicle_catalog)
        .map_err(|e| std::io::Error::other(format!("Failed to build vehicle catalog client: {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting server on {}:{} (request timeout {}s)",
        bind_address.0,
        bind_address.1,
        server_config.request_timeout_secs
    );

    HttpServer::new(move || {
        App::new()
            // Innermost first: the logger must see the echoed request id.
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(ACCESS_LOG_FORMAT))
            .wrap(Compress::default())
            .wrap(Cors::permissive())
            .configure(configure)
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(catalog.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
