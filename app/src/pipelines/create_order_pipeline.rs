// filmlab_pay/src/pipelines/create_order_pipeline.rs

use crate::codec;
use crate::errors::{AppError, Result as AppResult};
use crate::models::paypal::CreateOrderRequest;
use crate::models::requests::{field_text, is_filled, CreateOrderPayload};
use crate::models::{ChargeAmount, OrderMetadata, RollCount};
use crate::pipelines::common_steps::{acquire_access_token_step, ensure_paypal_configured_step};
use crate::pipelines::contexts::{CreateOrderCtxData, ValidatedOrder};
use orderflow::{ContextData, Pipeline, PipelineControl, Registry, SkipCondition};
use tracing::{error, info, instrument, warn};

pub const STEPS: &[&str] = &[
  "validate_request",
  "ensure_paypal_configured",
  "acquire_access_token",
  "encode_order_metadata",
  "create_paypal_order",
];

/// Checks the checkout form and builds the metadata. Runs before anything
/// touches the network.
pub fn validate_order(payload: &CreateOrderPayload) -> AppResult<ValidatedOrder> {
  let name = field_text(payload.name.as_ref());
  let email = field_text(payload.email.as_ref());
  let amount_raw = payload.amount.as_ref().filter(|v| is_filled(v));

  let (name, email, amount_raw) = match (name, email, amount_raw) {
    (Some(name), Some(email), Some(amount)) => (name, email, amount),
    _ => return Err(AppError::Validation("Missing required fields".to_string())),
  };
  let amount = ChargeAmount::parse(amount_raw)?;

  let metadata = OrderMetadata {
    name: Some(name),
    email,
    film: field_text(payload.film.as_ref()),
    rolls: payload.rolls.as_ref().and_then(RollCount::from_value),
    service_text: field_text(payload.service_text.as_ref()),
    amount: Some(amount.to_string()),
  };
  Ok(ValidatedOrder { amount, metadata })
}

#[instrument(name = "create_order::validate_request", skip(ctx_data), err(Display))]
async fn validate_request(ctx_data: ContextData<CreateOrderCtxData>) -> AppResult<PipelineControl> {
  let validated = validate_order(&ctx_data.read().payload)?;
  info!(amount = %validated.amount, "Checkout request validated.");
  ctx_data.write().validated = Some(validated);
  Ok(PipelineControl::Continue)
}

async fn encode_order_metadata(ctx_data: ContextData<CreateOrderCtxData>) -> AppResult<PipelineControl> {
  let custom_id = {
    let guard = ctx_data.read();
    let validated = guard
      .validated
      .as_ref()
      .ok_or_else(|| AppError::Internal("order metadata requested before validation".to_string()))?;
    codec::encode(&validated.metadata)
  };
  ctx_data.write().custom_id = Some(custom_id);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "create_order::create_paypal_order", skip(ctx_data), err(Display))]
async fn create_paypal_order(ctx_data: ContextData<CreateOrderCtxData>) -> AppResult<PipelineControl> {
  let (payments, token, request) = {
    let guard = ctx_data.read();
    let missing = |what: &str| AppError::Internal(format!("{} missing before order creation", what));
    let validated = guard.validated.as_ref().ok_or_else(|| missing("validated order"))?;
    let token = guard.access_token.clone().ok_or_else(|| missing("access token"))?;
    let custom_id = guard.custom_id.clone().ok_or_else(|| missing("custom_id"))?;
    let request = CreateOrderRequest::capture(
      validated.amount.to_string(),
      custom_id,
      &guard.app_state.config.brand_name,
      &guard.site_base_url,
    );
    (guard.app_state.payments.clone(), token, request)
  };

  let order = payments.create_order(&token, &request).await?;

  let approve_url = match order.approve_link() {
    Some(href) => href.to_string(),
    None => {
      error!(order_id = ?order.id, links = ?order.links, "PayPal order has no approve link.");
      return Err(AppError::Protocol("No PayPal approval link found".to_string()));
    }
  };
  let order_id = match order.id.filter(|id| !id.is_empty()) {
    Some(id) => id,
    None => {
      warn!("PayPal order response carried an approve link but no id.");
      return Err(AppError::Protocol("No PayPal order id returned".to_string()));
    }
  };

  info!(%order_id, "Approval link ready.");
  let mut guard = ctx_data.write();
  guard.order_id = Some(order_id);
  guard.approve_url = Some(approve_url);
  Ok(PipelineControl::Continue)
}

pub fn build_create_order_pipeline() -> Pipeline<CreateOrderCtxData, AppError> {
  let defs: Vec<(&str, bool, Option<SkipCondition<CreateOrderCtxData>>)> =
    STEPS.iter().map(|name| (*name, false, None)).collect();
  let mut p = Pipeline::<CreateOrderCtxData, AppError>::new(&defs);

  p.on_root("validate_request", validate_request);
  p.on_root("ensure_paypal_configured", ensure_paypal_configured_step::<CreateOrderCtxData>);
  p.on_root("acquire_access_token", acquire_access_token_step::<CreateOrderCtxData>);
  p.on_root("encode_order_metadata", encode_order_metadata);
  p.on_root("create_paypal_order", create_paypal_order);
  p
}

pub fn register_create_order_pipeline(flows: &Registry<AppError>) {
  flows.register_pipeline(build_create_order_pipeline());
  info!("Create-order pipeline registered.");
}
