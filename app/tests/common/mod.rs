// tests/common/mod.rs
#![allow(dead_code)]

use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use async_trait::async_trait;
use filmlab_pay::config::{AppConfig, PayPalCredentials};
use filmlab_pay::errors::{AppError, Result, UpstreamOp};
use filmlab_pay::models::paypal::{CreateOrderRequest, CreatedOrder, OrderDetails};
use filmlab_pay::services::{AccessToken, Mailer, OutgoingEmail, PaymentGateway};
use filmlab_pay::state::AppState;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Configuration fixtures ---

pub fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
  let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
  AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("test config should load")
}

/// Fully configured sandbox setup with a lab inbox.
pub fn test_config() -> AppConfig {
  config_from(&[
    ("PAYPAL_CLIENT_ID", "client-id"),
    ("PAYPAL_SECRET", "client-secret"),
    ("LAB_EMAIL", "lab@filmlab.test"),
    ("SENDGRID_API_KEY", "sg-key"),
  ])
}

pub fn config_without_paypal() -> AppConfig {
  config_from(&[("LAB_EMAIL", "lab@filmlab.test"), ("SENDGRID_API_KEY", "sg-key")])
}

// --- Payment gateway double ---

/// Records every call and answers from canned data.
pub struct FakeGateway {
  pub calls: Mutex<Vec<String>>,
  pub create_requests: Mutex<Vec<CreateOrderRequest>>,
  pub fail_token: bool,
  /// Create and capture fail as if PayPal could not be reached.
  pub unreachable: bool,
  pub create_error_status: Option<u16>,
  pub created_order: CreatedOrder,
  pub capture_error_status: Option<u16>,
  pub capture_payload: Value,
  pub order_details: OrderDetails,
}

impl Default for FakeGateway {
  fn default() -> Self {
    Self {
      calls: Mutex::new(Vec::new()),
      create_requests: Mutex::new(Vec::new()),
      fail_token: false,
      unreachable: false,
      create_error_status: None,
      created_order: created_order_with_links(json!([
        { "href": "https://api.sandbox.paypal.test/v2/checkout/orders/ORDER-1", "rel": "self", "method": "GET" },
        { "href": "https://www.sandbox.paypal.test/checkoutnow?token=ORDER-1", "rel": "approve", "method": "GET" }
      ])),
      capture_error_status: None,
      capture_payload: json!({ "id": "ORDER-1", "status": "COMPLETED" }),
      order_details: OrderDetails::default(),
    }
  }
}

pub fn created_order_with_links(links: Value) -> CreatedOrder {
  serde_json::from_value(json!({ "id": "ORDER-1", "status": "CREATED", "links": links })).expect("valid order json")
}

pub fn order_details(value: Value) -> OrderDetails {
  serde_json::from_value(value).expect("valid order details json")
}

impl FakeGateway {
  pub fn calls(&self) -> Vec<String> {
    self.calls.lock().unwrap().clone()
  }

  pub fn create_requests(&self) -> Vec<CreateOrderRequest> {
    self.create_requests.lock().unwrap().clone()
  }

  fn record(&self, call: impl Into<String>) {
    self.calls.lock().unwrap().push(call.into());
  }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
  async fn access_token(&self, credentials: &PayPalCredentials) -> Result<AccessToken> {
    self.record("access_token");
    assert_eq!(credentials.client_id, "client-id");
    if self.fail_token {
      return Err(AppError::upstream(UpstreamOp::AccessToken, Some(401), "invalid_client"));
    }
    Ok(AccessToken::new("test-token"))
  }

  async fn create_order(&self, token: &AccessToken, request: &CreateOrderRequest) -> Result<CreatedOrder> {
    self.record("create_order");
    assert_eq!(token.as_str(), "test-token");
    self.create_requests.lock().unwrap().push(request.clone());
    if self.unreachable {
      return Err(AppError::upstream(UpstreamOp::CreateOrder, None, "connection refused"));
    }
    if let Some(status) = self.create_error_status {
      return Err(AppError::upstream(UpstreamOp::CreateOrder, Some(status), "{\"name\":\"INVALID_REQUEST\"}"));
    }
    Ok(self.created_order.clone())
  }

  async fn capture_order(&self, _token: &AccessToken, order_id: &str) -> Result<Value> {
    self.record(format!("capture_order:{}", order_id));
    if self.unreachable {
      return Err(AppError::upstream(UpstreamOp::CaptureOrder, None, "connection refused"));
    }
    if let Some(status) = self.capture_error_status {
      return Err(AppError::upstream(UpstreamOp::CaptureOrder, Some(status), "{\"name\":\"UNPROCESSABLE_ENTITY\"}"));
    }
    Ok(self.capture_payload.clone())
  }

  async fn get_order(&self, _token: &AccessToken, order_id: &str) -> Result<OrderDetails> {
    self.record(format!("get_order:{}", order_id));
    Ok(self.order_details.clone())
  }
}

// --- Mailer double ---

#[derive(Default)]
pub struct FakeMailer {
  pub attempts: Mutex<Vec<OutgoingEmail>>,
  pub fail_for: Vec<String>,
}

impl FakeMailer {
  pub fn failing_for(addresses: &[&str]) -> Self {
    Self {
      attempts: Mutex::new(Vec::new()),
      fail_for: addresses.iter().map(|a| a.to_string()).collect(),
    }
  }

  /// Every send attempt, failed ones included.
  pub fn attempts(&self) -> Vec<OutgoingEmail> {
    self.attempts.lock().unwrap().clone()
  }

  pub fn recipients(&self) -> Vec<String> {
    let mut to: Vec<String> = self.attempts().into_iter().map(|e| e.to).collect();
    to.sort();
    to
  }
}

#[async_trait]
impl Mailer for FakeMailer {
  async fn send(&self, email: &OutgoingEmail) -> Result<()> {
    self.attempts.lock().unwrap().push(email.clone());
    if self.fail_for.contains(&email.to) {
      return Err(AppError::upstream(UpstreamOp::SendMail, Some(503), "service unavailable"));
    }
    Ok(())
  }
}

// --- Local provider stub ---

#[derive(Debug, Clone)]
pub struct RecordedRequest {
  pub method: String,
  /// Path exactly as sent, percent-encoding intact.
  pub path: String,
  pub authorization: Option<String>,
  pub content_type: Option<String>,
  pub body: String,
}

impl RecordedRequest {
  pub fn json(&self) -> Value {
    serde_json::from_str(&self.body).expect("request body is JSON")
  }
}

/// HTTP server on an ephemeral port that answers every request with the
/// same canned response and records what it received.
pub struct ProviderStub {
  pub base_url: String,
  requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ProviderStub {
  pub async fn start(status: u16, body: &str) -> Self {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let sink = requests.clone();
    let body = body.to_string();
    let server = HttpServer::new(move || {
      let sink = sink.clone();
      let body = body.clone();
      App::new().default_service(web::to(move |req: HttpRequest, payload: web::Bytes| {
        let sink = sink.clone();
        let body = body.clone();
        async move {
          let header = |name: &str| {
            req
              .headers()
              .get(name)
              .and_then(|v| v.to_str().ok())
              .map(str::to_string)
          };
          sink.lock().unwrap().push(RecordedRequest {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            authorization: header("authorization"),
            content_type: header("content-type"),
            body: String::from_utf8_lossy(&payload).to_string(),
          });
          HttpResponse::build(StatusCode::from_u16(status).unwrap())
            .content_type("application/json")
            .body(body)
        }
      }))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("stub binds");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    Self {
      base_url: format!("http://{}", addr),
      requests,
    }
  }

  pub fn requests(&self) -> Vec<RecordedRequest> {
    self.requests.lock().unwrap().clone()
  }
}

// --- App wiring ---

pub fn app_state(config: AppConfig, gateway: Arc<FakeGateway>, mailer: Arc<FakeMailer>) -> web::Data<AppState> {
  web::Data::new(filmlab_pay::build_app_state(config, gateway, mailer))
}
