use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use customer_hub::configure;
use customer_hub::context::RequestContext;
use customer_hub::dto::vehicle::VehicleQuery;
use customer_hub::middleware::RequestIdMiddleware;
use customer_hub::models::config::VehicleCatalogConfig;
use customer_hub::pagination::Meta;
use customer_hub::services::ServiceError;
use customer_hub::services::vehicle::VehicleCatalogClient;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn catalog(server: &MockServer, timeout_secs: u64) -> VehicleCatalogClient {
    VehicleCatalogClient::new(&VehicleCatalogConfig {
        base_url: server.uri(),
        customer_id: "C220010001".to_string(),
        timeout_secs,
    })
    .unwrap()
}

fn listing() -> Value {
    json!({
        "data": [{
            "vehicle_id": 11,
            "vehicle_no": "B 9001 KT",
            "vehicle_desc": "Box truck",
            "vehicle_type_name": "CDD",
            "driver_id": 3,
            "driver_name": "Joko",
            "helper_id": 4,
            "helper_name": "Rudi",
            "length": 4.2,
            "width": 2.0,
            "height": 2.1,
            "volume": 17.64
        }],
        "paging": {
            "total_record": 42,
            "page_current": 1,
            "page_limit": 20,
            "page_total": 3
        }
    })
}

fn ctx(budget: Duration) -> RequestContext {
    RequestContext::new(Some("vehicle-test".to_string()), budget)
}

#[actix_web::test]
async fn test_vehicle_route_translates_catalog_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/master/v1/vehicles"))
        .and(header("cust_id", "C220010001"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "20"))
        .and(query_param("is_active", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .expect(1)
        .mount(&server)
        .await;

    let app = test::init_service(
        App::new()
            .wrap(RequestIdMiddleware)
            .configure(configure)
            .app_data(web::Data::new(catalog(&server, 5))),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/vehicles?limit=20")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(
        body["meta"],
        json!({"total_data": 42, "page": 1, "limit": 20, "total_page": 3})
    );
    assert_eq!(body["data"][0]["vehicle_no"], "B 9001 KT");
    assert_eq!(body["data"][0]["helper_name"], "Rudi");
    assert!(!body["trace_id"].as_str().unwrap().is_empty());
}

#[actix_web::test]
async fn test_vehicle_route_reports_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/master/v1/vehicles"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let app = test::init_service(
        App::new()
            .wrap(RequestIdMiddleware)
            .configure(configure)
            .app_data(web::Data::new(catalog(&server, 5))),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/vehicles").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "UPSTREAM_ERROR");
    assert!(body["errors"].as_str().unwrap().contains("502"));
}

#[actix_web::test]
async fn test_vehicle_route_accepts_null_catalog_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/master/v1/vehicles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "vehicle_id": 7,
                "vehicle_no": "B 1",
                "driver_name": null,
                "helper_id": null,
                "helper_name": null
            }],
            "paging": {
                "total_record": 1,
                "page_current": 1,
                "page_limit": 10,
                "page_total": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = test::init_service(
        App::new()
            .wrap(RequestIdMiddleware)
            .configure(configure)
            .app_data(web::Data::new(catalog(&server, 5))),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/vehicles").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(body["data"][0]["vehicle_no"], "B 1");
    assert_eq!(body["data"][0]["helper_id"], 0);
    assert_eq!(body["data"][0]["helper_name"], "");
    assert_eq!(body["data"][0]["driver_name"], "");
}

#[actix_web::test]
async fn test_client_forwards_normalized_paging_and_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/master/v1/vehicles"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .and(query_param("is_active", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .expect(1)
        .mount(&server)
        .await;

    let query = VehicleQuery {
        page: Some(0),
        limit: Some(0),
        is_active: Some(1),
        ..VehicleQuery::default()
    };
    let (vehicles, meta) = catalog(&server, 5)
        .list_vehicles(&ctx(Duration::from_secs(30)), &query)
        .await
        .unwrap();

    assert_eq!(vehicles.len(), 1);
    assert_eq!(
        meta,
        Meta {
            total_data: 42,
            page: 1,
            limit: 20,
            total_page: 3,
        }
    );
}

#[actix_web::test]
async fn test_malformed_catalog_body_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = catalog(&server, 5)
        .list_vehicles(&ctx(Duration::from_secs(30)), &VehicleQuery::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "UPSTREAM_ERROR");
}

#[actix_web::test]
async fn test_slow_catalog_times_out_with_client_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = catalog(&server, 1)
        .list_vehicles(&ctx(Duration::from_secs(30)), &VehicleQuery::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "UPSTREAM_ERROR");
}

#[actix_web::test]
async fn test_slow_catalog_past_request_deadline_is_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = catalog(&server, 10)
        .list_vehicles(&ctx(Duration::from_millis(300)), &VehicleQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Timeout), "{err}");
}

#[tokio::test]
async fn test_exhausted_budget_skips_the_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .expect(0)
        .mount(&server)
        .await;

    let err = catalog(&server, 5)
        .list_vehicles(&ctx(Duration::ZERO), &VehicleQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Timeout));
}
