// tests/create_order_tests.rs
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::{
  app_state, config_from, config_without_paypal, created_order_with_links, test_config, FakeGateway, FakeMailer,
};
use filmlab_pay::codec;
use filmlab_pay::models::requests::CreateOrderResponse;
use filmlab_pay::web::configure_app_routes;
use serde_json::{json, Value};
use std::sync::Arc;

async fn post_create_order(
  config: filmlab_pay::config::AppConfig,
  gateway: Arc<FakeGateway>,
  body: &str,
) -> (StatusCode, String) {
  let app = test::init_service(
    App::new()
      .app_data(app_state(config, gateway, Arc::new(FakeMailer::default())))
      .configure(configure_app_routes),
  )
  .await;
  let req = test::TestRequest::post()
    .uri("/create-order")
    .insert_header(("host", "shop.filmlab.test"))
    .insert_header(("content-type", "application/json"))
    .set_payload(body.to_string())
    .to_request();
  let resp = test::call_service(&app, req).await;
  let status = resp.status();
  let bytes = test::read_body(resp).await;
  (status, String::from_utf8_lossy(&bytes).to_string())
}

#[actix_web::test]
async fn creates_order_and_returns_the_approve_link() {
  common::setup_tracing();
  let gateway = Arc::new(FakeGateway::default());
  let body = json!({ "name": "Ann", "email": "c@x.com", "amount": "24", "rolls": 2 }).to_string();

  let (status, text) = post_create_order(test_config(), gateway.clone(), &body).await;

  assert_eq!(status, StatusCode::OK, "body: {}", text);
  let resp: CreateOrderResponse = serde_json::from_str(&text).unwrap();
  assert_eq!(resp.order_id, "ORDER-1");
  assert_eq!(resp.approve_url, "https://www.sandbox.paypal.test/checkoutnow?token=ORDER-1");
  assert_eq!(gateway.calls(), vec!["access_token", "create_order"]);
}

#[actix_web::test]
async fn charge_and_metadata_share_the_normalized_amount() {
  common::setup_tracing();
  let gateway = Arc::new(FakeGateway::default());
  let body = json!({ "name": "Ann", "email": "c@x.com", "amount": "24" }).to_string();

  let (status, _) = post_create_order(test_config(), gateway.clone(), &body).await;
  assert_eq!(status, StatusCode::OK);

  let requests = gateway.create_requests();
  assert_eq!(requests.len(), 1);
  let unit = &requests[0].purchase_units[0];
  assert_eq!(unit.amount.value, "24.00");
  assert_eq!(unit.amount.currency_code, "EUR");
  let meta = codec::decode(&unit.custom_id).expect("metadata fits in custom_id");
  assert_eq!(meta.amount.as_deref(), Some("24.00"));
  assert_eq!(meta.email, "c@x.com");
  assert_eq!(meta.name.as_deref(), Some("Ann"));
}

#[actix_web::test]
async fn order_request_carries_capture_intent_and_redirects() {
  common::setup_tracing();
  let gateway = Arc::new(FakeGateway::default());
  let body = json!({ "name": "Ann", "email": "c@x.com", "amount": 12.5 }).to_string();

  post_create_order(test_config(), gateway.clone(), &body).await;

  let sent = serde_json::to_value(&gateway.create_requests()[0]).unwrap();
  assert_eq!(sent["intent"], "CAPTURE");
  assert_eq!(sent["purchase_units"][0]["amount"]["value"], "12.50");
  let ctx = &sent["application_context"];
  assert_eq!(ctx["brand_name"], "Analog Film Lab");
  assert_eq!(ctx["landing_page"], "NO_PREFERENCE");
  assert_eq!(ctx["user_action"], "PAY_NOW");
  assert_eq!(ctx["return_url"], "http://shop.filmlab.test/payment-success.html");
  assert_eq!(ctx["cancel_url"], "http://shop.filmlab.test/payment-cancel.html");
}

#[actix_web::test]
async fn configured_site_url_wins_over_the_request_host() {
  common::setup_tracing();
  let gateway = Arc::new(FakeGateway::default());
  let config = config_from(&[
    ("PAYPAL_CLIENT_ID", "client-id"),
    ("PAYPAL_SECRET", "client-secret"),
    ("DEPLOY_PRIME_URL", "https://deploy-preview-7--filmlab.netlify.app/"),
  ]);
  let body = json!({ "name": "Ann", "email": "c@x.com", "amount": "5" }).to_string();

  post_create_order(config, gateway.clone(), &body).await;

  let ctx = &gateway.create_requests()[0].application_context;
  assert_eq!(ctx.return_url, "https://deploy-preview-7--filmlab.netlify.app/payment-success.html");
}

#[actix_web::test]
async fn missing_fields_are_rejected_before_any_call() {
  common::setup_tracing();
  let cases: Vec<Value> = vec![
    json!({ "email": "c@x.com", "amount": "24" }),
    json!({ "name": "Ann", "amount": "24" }),
    json!({ "name": "Ann", "email": "c@x.com" }),
    json!({ "name": "", "email": "c@x.com", "amount": "24" }),
    json!({ "name": "Ann", "email": "c@x.com", "amount": 0 }),
    json!(null),
  ];
  for body in cases {
    let gateway = Arc::new(FakeGateway::default());
    let (status, text) = post_create_order(test_config(), gateway.clone(), &body.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
    assert_eq!(text, "Missing required fields");
    assert!(gateway.calls().is_empty());
  }
}

#[actix_web::test]
async fn whitespace_only_fields_count_as_filled_in() {
  common::setup_tracing();
  let gateway = Arc::new(FakeGateway::default());
  let body = json!({ "name": " ", "email": "c@x.com", "amount": "24" }).to_string();

  let (status, text) = post_create_order(test_config(), gateway.clone(), &body).await;

  assert_eq!(status, StatusCode::OK, "body: {}", text);
  let custom_id = gateway.create_requests()[0].purchase_units[0].custom_id.clone();
  let meta = codec::decode(&custom_id).expect("metadata fits");
  assert_eq!(meta.name.as_deref(), Some(" "));
}

#[actix_web::test]
async fn invalid_amounts_are_rejected_before_any_call() {
  common::setup_tracing();
  for amount in [json!("-5"), json!("abc"), json!(-2), json!("0.00"), json!("0.001")] {
    let gateway = Arc::new(FakeGateway::default());
    let body = json!({ "name": "Ann", "email": "c@x.com", "amount": amount }).to_string();
    let (status, text) = post_create_order(test_config(), gateway.clone(), &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "amount {}", amount);
    assert_eq!(text, "Invalid amount");
    assert!(gateway.calls().is_empty());
  }
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
  common::setup_tracing();
  let gateway = Arc::new(FakeGateway::default());
  let (status, text) = post_create_order(test_config(), gateway.clone(), "{ not json").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(text, "Invalid JSON");
  assert!(gateway.calls().is_empty());
}

#[actix_web::test]
async fn missing_credentials_fail_without_network_calls() {
  common::setup_tracing();
  let gateway = Arc::new(FakeGateway::default());
  let body = json!({ "name": "Ann", "email": "c@x.com", "amount": "24" }).to_string();

  let (status, text) = post_create_order(config_without_paypal(), gateway.clone(), &body).await;

  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(text, "PayPal not configured");
  assert!(gateway.calls().is_empty());
}

#[actix_web::test]
async fn provider_failures_do_not_leak_details() {
  common::setup_tracing();
  let body = json!({ "name": "Ann", "email": "c@x.com", "amount": "24" }).to_string();

  let gateway = Arc::new(FakeGateway {
    create_error_status: Some(422),
    ..FakeGateway::default()
  });
  let (status, text) = post_create_order(test_config(), gateway, &body).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(text, "Failed to create PayPal order");

  let gateway = Arc::new(FakeGateway {
    fail_token: true,
    ..FakeGateway::default()
  });
  let (status, text) = post_create_order(test_config(), gateway.clone(), &body).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(text, "Server error");
  assert_eq!(gateway.calls(), vec!["access_token"]);
}

#[actix_web::test]
async fn unreachable_paypal_is_a_plain_server_error() {
  common::setup_tracing();
  let gateway = Arc::new(FakeGateway {
    unreachable: true,
    ..FakeGateway::default()
  });
  let body = json!({ "name": "Ann", "email": "c@x.com", "amount": "24" }).to_string();
  let (status, text) = post_create_order(test_config(), gateway, &body).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(text, "Server error");
}

#[actix_web::test]
async fn order_without_approve_link_is_an_integration_error() {
  common::setup_tracing();
  let gateway = Arc::new(FakeGateway {
    created_order: created_order_with_links(json!([{ "href": "https://x.test/self", "rel": "self" }])),
    ..FakeGateway::default()
  });
  let body = json!({ "name": "Ann", "email": "c@x.com", "amount": "24" }).to_string();

  let (status, text) = post_create_order(test_config(), gateway, &body).await;

  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(text, "No PayPal approval link found");
}

#[actix_web::test]
async fn non_post_methods_are_not_allowed() {
  common::setup_tracing();
  let app = test::init_service(
    App::new()
      .app_data(app_state(test_config(), Arc::new(FakeGateway::default()), Arc::new(FakeMailer::default())))
      .configure(configure_app_routes),
  )
  .await;

  for uri in ["/create-order", "/.netlify/functions/create-order"] {
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(test::read_body(resp).await, web::Bytes::from_static(b"Method Not Allowed"));
  }
}

#[actix_web::test]
async fn functions_prefix_route_reaches_the_same_handler() {
  common::setup_tracing();
  let gateway = Arc::new(FakeGateway::default());
  let app = test::init_service(
    App::new()
      .app_data(app_state(test_config(), gateway.clone(), Arc::new(FakeMailer::default())))
      .configure(configure_app_routes),
  )
  .await;
  let req = test::TestRequest::post()
    .uri("/.netlify/functions/create-order")
    .set_json(json!({ "name": "Ann", "email": "c@x.com", "amount": "24" }))
    .to_request();
  let resp: CreateOrderResponse = test::call_and_read_body_json(&app, req).await;
  assert_eq!(resp.order_id, "ORDER-1");
  assert_eq!(gateway.calls().len(), 2);
}

#[actix_web::test]
async fn health_check_reports_ok() {
  common::setup_tracing();
  let app = test::init_service(
    App::new()
      .app_data(app_state(test_config(), Arc::new(FakeGateway::default()), Arc::new(FakeMailer::default())))
      .configure(configure_app_routes),
  )
  .await;
  let req = test::TestRequest::get().uri("/health").to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body, json!({ "status": "ok" }));
}
