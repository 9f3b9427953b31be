// filmlab_pay/src/services/paypal.rs

//! PayPal REST client behind the `PaymentGateway` seam.

use crate::codec::encode_uri_component;
use crate::config::PayPalCredentials;
use crate::errors::{AppError, Result, UpstreamOp};
use crate::models::paypal::{AccessTokenResponse, CreateOrderRequest, CreatedOrder, OrderDetails};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde_json::Value;
use std::fmt;
use tracing::{debug, error, info, instrument};

/// Short-lived OAuth bearer token. Never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
  pub fn new(token: impl Into<String>) -> Self {
    AccessToken(token.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for AccessToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("AccessToken([REDACTED])")
  }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
  /// Exchanges client credentials for a bearer token.
  async fn access_token(&self, credentials: &PayPalCredentials) -> Result<AccessToken>;

  async fn create_order(&self, token: &AccessToken, request: &CreateOrderRequest) -> Result<CreatedOrder>;

  /// Captures an approved order. The provider's payload is returned as-is.
  async fn capture_order(&self, token: &AccessToken, order_id: &str) -> Result<Value>;

  async fn get_order(&self, token: &AccessToken, order_id: &str) -> Result<OrderDetails>;
}

#[derive(Clone)]
pub struct PayPalClient {
  http: Client,
  base_url: String,
}

impl PayPalClient {
  pub fn new(http: Client, base_url: impl Into<String>) -> Self {
    Self {
      http,
      base_url: base_url.into().trim_end_matches('/').to_string(),
    }
  }

  fn order_url(&self, order_id: &str) -> String {
    format!("{}/v2/checkout/orders/{}", self.base_url, encode_uri_component(order_id))
  }
}

/// Splits a response into status and body text, turning non-2xx into an
/// `Upstream` error carrying the provider's raw text for the logs.
async fn read_body(op: UpstreamOp, response: Response) -> Result<String> {
  let status = response.status();
  let body = response
    .text()
    .await
    .map_err(|e| AppError::upstream(op, Some(status.as_u16()), e.to_string()))?;
  if !status.is_success() {
    error!(operation = %op, status = status.as_u16(), body = %body, "PayPal returned an error.");
    return Err(AppError::upstream(op, Some(status.as_u16()), body));
  }
  Ok(body)
}

fn transport_error(op: UpstreamOp) -> impl FnOnce(reqwest::Error) -> AppError {
  move |e| {
    error!(operation = %op, error = %e, "PayPal request failed to complete.");
    AppError::upstream(op, e.status().map(|s| s.as_u16()), e.to_string())
  }
}

#[async_trait]
impl PaymentGateway for PayPalClient {
  #[instrument(name = "paypal::access_token", skip_all, err(Display))]
  async fn access_token(&self, credentials: &PayPalCredentials) -> Result<AccessToken> {
    let op = UpstreamOp::AccessToken;
    let response = self
      .http
      .post(format!("{}/v1/oauth2/token", self.base_url))
      .basic_auth(&credentials.client_id, Some(&credentials.secret))
      .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
      .body("grant_type=client_credentials")
      .send()
      .await
      .map_err(transport_error(op))?;
    let body = read_body(op, response).await?;

    let parsed: AccessTokenResponse = serde_json::from_str(&body)
      .map_err(|e| AppError::Protocol(format!("Unreadable PayPal token response: {}", e)))?;
    let token = parsed
      .access_token
      .filter(|t| !t.is_empty())
      .ok_or_else(|| AppError::Protocol("PayPal token response had no access_token".to_string()))?;
    debug!(expires_in = ?parsed.expires_in, "Obtained PayPal access token.");
    Ok(AccessToken::new(token))
  }

  #[instrument(name = "paypal::create_order", skip_all, err(Display))]
  async fn create_order(&self, token: &AccessToken, request: &CreateOrderRequest) -> Result<CreatedOrder> {
    let op = UpstreamOp::CreateOrder;
    let response = self
      .http
      .post(format!("{}/v2/checkout/orders", self.base_url))
      .bearer_auth(token.as_str())
      .json(request)
      .send()
      .await
      .map_err(transport_error(op))?;
    let body = read_body(op, response).await?;

    // An unreadable 2xx body is treated as an order with no links; the caller
    // reports the missing approval link.
    let order = serde_json::from_str::<CreatedOrder>(&body).unwrap_or_default();
    info!(order_id = ?order.id, status = ?order.status, "PayPal order created.");
    Ok(order)
  }

  #[instrument(name = "paypal::capture_order", skip(self, token), err(Display))]
  async fn capture_order(&self, token: &AccessToken, order_id: &str) -> Result<Value> {
    let op = UpstreamOp::CaptureOrder;
    let response = self
      .http
      .post(format!("{}/capture", self.order_url(order_id)))
      .bearer_auth(token.as_str())
      .header(CONTENT_TYPE, "application/json")
      .send()
      .await
      .map_err(transport_error(op))?;
    let body = read_body(op, response).await?;

    let capture =
      serde_json::from_str::<Value>(&body).unwrap_or_else(|_| Value::Object(Default::default()));
    info!("PayPal order captured.");
    Ok(capture)
  }

  #[instrument(name = "paypal::get_order", skip(self, token), err(Display))]
  async fn get_order(&self, token: &AccessToken, order_id: &str) -> Result<OrderDetails> {
    let op = UpstreamOp::GetOrder;
    let response = self
      .http
      .get(self.order_url(order_id))
      .bearer_auth(token.as_str())
      .send()
      .await
      .map_err(transport_error(op))?;
    let body = read_body(op, response).await?;

    serde_json::from_str::<OrderDetails>(&body)
      .map_err(|e| AppError::Protocol(format!("Unreadable PayPal order {}: {}", order_id, e)))
  }
}
