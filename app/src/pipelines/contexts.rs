// filmlab_pay/src/pipelines/contexts.rs

//! Per-request data each pipeline works on. Handlers see these wrapped in
//! `orderflow::ContextData`.

use crate::config::PayPalCredentials;
use crate::models::paypal::{OrderDetails, WebhookEvent};
use crate::models::requests::{CaptureOrderPayload, CreateOrderPayload};
use crate::models::{ChargeAmount, OrderMetadata};
use crate::services::notifications::CustomerContact;
use crate::services::{AccessToken, OutgoingEmail};
use crate::state::AppState;
use serde_json::Value;

// --- Order Initiator ---

/// Checkout form after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOrder {
  pub amount: ChargeAmount,
  pub metadata: OrderMetadata,
}

#[derive(Clone)]
pub struct CreateOrderCtxData {
  pub app_state: AppState,
  pub payload: CreateOrderPayload,
  /// Origin used for PayPal's return and cancel redirects, without trailing `/`.
  pub site_base_url: String,
  pub validated: Option<ValidatedOrder>,
  pub credentials: Option<PayPalCredentials>,
  pub access_token: Option<AccessToken>,
  pub custom_id: Option<String>,
  pub order_id: Option<String>,
  pub approve_url: Option<String>,
}

impl CreateOrderCtxData {
  pub fn new(app_state: AppState, payload: CreateOrderPayload, site_base_url: String) -> Self {
    Self {
      app_state,
      payload,
      site_base_url,
      validated: None,
      credentials: None,
      access_token: None,
      custom_id: None,
      order_id: None,
      approve_url: None,
    }
  }
}

// --- Order Capturer ---

#[derive(Clone)]
pub struct CaptureOrderCtxData {
  pub app_state: AppState,
  pub payload: CaptureOrderPayload,
  pub order_id: Option<String>,
  pub credentials: Option<PayPalCredentials>,
  pub access_token: Option<AccessToken>,
  /// Provider payload, returned to the caller verbatim.
  pub capture: Option<Value>,
  /// Set when PayPal refused the capture; the pipeline stops without error.
  pub capture_failed: bool,
}

impl CaptureOrderCtxData {
  pub fn new(app_state: AppState, payload: CaptureOrderPayload) -> Self {
    Self {
      app_state,
      payload,
      order_id: None,
      credentials: None,
      access_token: None,
      capture: None,
      capture_failed: false,
    }
  }
}

// --- Webhook Reconciler ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
  Lab,
  Customer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchFailure {
  pub recipient: Recipient,
  pub address: String,
  pub error: String,
}

/// What happened to each notification of one reconciled order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
  /// False when no lab address is configured.
  pub lab_attempted: bool,
  pub delivered: Vec<Recipient>,
  pub failures: Vec<DispatchFailure>,
}

/// Final state of one webhook delivery. Every variant is acknowledged with
/// 200 so PayPal does not redeliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
  Ignored { event_type: Option<String> },
  MissingOrderId,
  NoCustomerEmail { order_id: String },
  Delivered { order_id: String, lab_notified: bool },
  PartiallyDelivered { order_id: String, failures: Vec<DispatchFailure> },
}

impl ReconcileOutcome {
  pub fn ack_message(&self) -> &'static str {
    match self {
      ReconcileOutcome::Ignored { .. } => "Ignored other event",
      ReconcileOutcome::MissingOrderId => "Missing order_id",
      ReconcileOutcome::NoCustomerEmail { .. } => "No customer email",
      ReconcileOutcome::Delivered { .. } | ReconcileOutcome::PartiallyDelivered { .. } => "Webhook handled",
    }
  }
}

#[derive(Clone)]
pub struct ReconcileCtxData {
  pub app_state: AppState,
  pub event: WebhookEvent,
  pub order_id: Option<String>,
  pub credentials: Option<PayPalCredentials>,
  pub access_token: Option<AccessToken>,
  pub order: Option<OrderDetails>,
  pub metadata: Option<OrderMetadata>,
  pub customer: Option<CustomerContact>,
  pub lab_email: Option<OutgoingEmail>,
  pub customer_email: Option<OutgoingEmail>,
  pub report: Option<DispatchReport>,
  pub outcome: Option<ReconcileOutcome>,
}

impl ReconcileCtxData {
  pub fn new(app_state: AppState, event: WebhookEvent) -> Self {
    Self {
      app_state,
      event,
      order_id: None,
      credentials: None,
      access_token: None,
      order: None,
      metadata: None,
      customer: None,
      lab_email: None,
      customer_email: None,
      report: None,
      outcome: None,
    }
  }
}
