// filmlab_pay/src/pipelines/capture_order_pipeline.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::requests::{is_filled, CaptureOrderPayload};
use crate::pipelines::common_steps::{acquire_access_token_step, ensure_paypal_configured_step};
use crate::pipelines::contexts::CaptureOrderCtxData;
use orderflow::{ContextData, Pipeline, PipelineControl, Registry};
use serde_json::Value;
use tracing::{info, instrument, warn};

/// `orderId`, falling back to `token` only when `orderId` is not filled in.
/// Whichever is picked must be a string.
pub fn requested_order_id(payload: &CaptureOrderPayload) -> AppResult<String> {
  let picked = payload
    .order_id
    .as_ref()
    .filter(|v| is_filled(v))
    .or_else(|| payload.token.as_ref().filter(|v| is_filled(v)));
  match picked {
    Some(Value::String(id)) => Ok(id.clone()),
    _ => Err(AppError::Validation("Missing orderId".to_string())),
  }
}

async fn validate_order_id(ctx_data: ContextData<CaptureOrderCtxData>) -> AppResult<PipelineControl> {
  let order_id = requested_order_id(&ctx_data.read().payload)?;
  ctx_data.write().order_id = Some(order_id);
  Ok(PipelineControl::Continue)
}

/// A capture PayPal answered with an error status is recorded on the
/// context and stops the pipeline. Transport failures still fail.
#[instrument(name = "capture_order::capture_paypal_order", skip(ctx_data), err(Display))]
async fn capture_paypal_order(ctx_data: ContextData<CaptureOrderCtxData>) -> AppResult<PipelineControl> {
  let (payments, token, order_id) = {
    let guard = ctx_data.read();
    let token = guard
      .access_token
      .clone()
      .ok_or_else(|| AppError::Internal("access token missing before capture".to_string()))?;
    let order_id = guard
      .order_id
      .clone()
      .ok_or_else(|| AppError::Internal("order id missing before capture".to_string()))?;
    (guard.app_state.payments.clone(), token, order_id)
  };

  match payments.capture_order(&token, &order_id).await {
    Ok(capture) => {
      info!(%order_id, "Order captured.");
      ctx_data.write().capture = Some(capture);
      Ok(PipelineControl::Continue)
    }
    Err(e @ AppError::Upstream { status: Some(_), .. }) => {
      warn!(%order_id, error = %e, "PayPal refused the capture.");
      ctx_data.write().capture_failed = true;
      Ok(PipelineControl::Stop)
    }
    Err(e) => Err(e),
  }
}

pub fn build_capture_order_pipeline() -> Pipeline<CaptureOrderCtxData, AppError> {
  let mut p = Pipeline::<CaptureOrderCtxData, AppError>::new(&[
    ("validate_order_id", false, None),
    ("ensure_paypal_configured", false, None),
    ("acquire_access_token", false, None),
    ("capture_paypal_order", false, None),
  ]);

  p.on_root("validate_order_id", validate_order_id);
  p.on_root("ensure_paypal_configured", ensure_paypal_configured_step::<CaptureOrderCtxData>);
  p.on_root("acquire_access_token", acquire_access_token_step::<CaptureOrderCtxData>);
  p.on_root("capture_paypal_order", capture_paypal_order);
  p
}

pub fn register_capture_order_pipeline(flows: &Registry<AppError>) {
  flows.register_pipeline(build_capture_order_pipeline());
  info!("Capture-order pipeline registered.");
}
