// filmlab_pay/src/pipelines/webhook_pipeline.rs

//! Reconciles `PAYMENT.CAPTURE.COMPLETED` notifications into the two
//! "order paid" emails.
//!
//! Early exits (other event types, no order id, no reachable customer) stop
//! the pipeline with an outcome instead of failing, so the handler still
//! acknowledges with 200. Only PayPal lookups can fail the run.

use crate::codec;
use crate::errors::{AppError, Result as AppResult};
use crate::pipelines::common_steps::{acquire_access_token_step, ensure_paypal_configured_step};
use crate::pipelines::contexts::{
  DispatchFailure, DispatchReport, ReconcileCtxData, ReconcileOutcome, Recipient,
};
use crate::services::notifications;
use crate::services::{Mailer, OutgoingEmail};
use orderflow::{ContextData, Pipeline, PipelineControl, Registry};
use tracing::{debug, info, instrument, warn};

fn internal(what: &str) -> AppError {
  AppError::Internal(format!("{} missing during webhook reconciliation", what))
}

async fn filter_event_type(ctx_data: ContextData<ReconcileCtxData>) -> AppResult<PipelineControl> {
  let mut guard = ctx_data.write();
  if guard.event.is_capture_completed() {
    return Ok(PipelineControl::Continue);
  }
  let event_type = guard.event.event_type.clone();
  info!(event_type = ?event_type, "Ignoring webhook event.");
  guard.outcome = Some(ReconcileOutcome::Ignored { event_type });
  Ok(PipelineControl::Stop)
}

async fn extract_order_id(ctx_data: ContextData<ReconcileCtxData>) -> AppResult<PipelineControl> {
  let mut guard = ctx_data.write();
  match guard.event.related_order_id() {
    Some(order_id) => {
      debug!(%order_id, "Webhook refers to order.");
      guard.order_id = Some(order_id);
      Ok(PipelineControl::Continue)
    }
    None => {
      warn!(event_id = ?guard.event.id, "Capture event without related order id.");
      guard.outcome = Some(ReconcileOutcome::MissingOrderId);
      Ok(PipelineControl::Stop)
    }
  }
}

#[instrument(name = "webhook::fetch_order", skip(ctx_data), err(Display))]
async fn fetch_order(ctx_data: ContextData<ReconcileCtxData>) -> AppResult<PipelineControl> {
  let (payments, token, order_id) = {
    let guard = ctx_data.read();
    let token = guard.access_token.clone().ok_or_else(|| internal("access token"))?;
    let order_id = guard.order_id.clone().ok_or_else(|| internal("order id"))?;
    (guard.app_state.payments.clone(), token, order_id)
  };

  let order = payments.get_order(&token, &order_id).await?;
  let metadata = order.custom_id().and_then(codec::decode);
  if metadata.is_none() {
    debug!(%order_id, "No structured metadata on order; relying on payer details.");
  }

  let mut guard = ctx_data.write();
  guard.order = Some(order);
  guard.metadata = metadata;
  Ok(PipelineControl::Continue)
}

async fn resolve_customer(ctx_data: ContextData<ReconcileCtxData>) -> AppResult<PipelineControl> {
  let mut guard = ctx_data.write();
  let order = guard.order.as_ref().ok_or_else(|| internal("order"))?;
  let customer = notifications::resolve_customer(guard.metadata.as_ref(), order);
  match customer {
    Some(customer) => {
      guard.customer = Some(customer);
      Ok(PipelineControl::Continue)
    }
    None => {
      let order_id = guard.order_id.clone().unwrap_or_default();
      warn!(%order_id, "No customer email on metadata or payer record.");
      guard.outcome = Some(ReconcileOutcome::NoCustomerEmail { order_id });
      Ok(PipelineControl::Stop)
    }
  }
}

async fn compose_notifications(ctx_data: ContextData<ReconcileCtxData>) -> AppResult<PipelineControl> {
  let mut guard = ctx_data.write();
  let customer = guard.customer.clone().ok_or_else(|| internal("customer"))?;
  let summary = notifications::order_summary(guard.metadata.as_ref(), &customer.email);

  let config = guard.app_state.config.clone();
  guard.lab_email = config
    .mail
    .lab_email
    .as_deref()
    .map(|lab| notifications::lab_notification(lab, &summary));
  guard.customer_email = Some(notifications::customer_confirmation(
    &customer,
    &summary,
    &config.brand_name,
  ));
  Ok(PipelineControl::Continue)
}

async fn send_one(
  mailer: &dyn Mailer,
  recipient: Recipient,
  email: Option<&OutgoingEmail>,
) -> Option<Result<Recipient, DispatchFailure>> {
  let email = email?;
  Some(match mailer.send(email).await {
    Ok(()) => Ok(recipient),
    Err(e) => {
      warn!(?recipient, to = %email.to, error = %e, "Notification email failed.");
      Err(DispatchFailure {
        recipient,
        address: email.to.clone(),
        error: e.to_string(),
      })
    }
  })
}

/// Sends both emails concurrently. A failed send is logged and recorded; it
/// never stops the other send and never fails the pipeline.
#[instrument(name = "webhook::dispatch_notifications", skip(ctx_data))]
async fn dispatch_notifications(ctx_data: ContextData<ReconcileCtxData>) -> AppResult<PipelineControl> {
  let (mailer, lab_email, customer_email, order_id) = {
    let guard = ctx_data.read();
    (
      guard.app_state.mailer.clone(),
      guard.lab_email.clone(),
      guard.customer_email.clone(),
      guard.order_id.clone().unwrap_or_default(),
    )
  };

  let (lab_result, customer_result) = tokio::join!(
    send_one(mailer.as_ref(), Recipient::Lab, lab_email.as_ref()),
    send_one(mailer.as_ref(), Recipient::Customer, customer_email.as_ref()),
  );

  let mut report = DispatchReport {
    lab_attempted: lab_result.is_some(),
    ..DispatchReport::default()
  };
  for result in [lab_result, customer_result].into_iter().flatten() {
    match result {
      Ok(recipient) => report.delivered.push(recipient),
      Err(failure) => report.failures.push(failure),
    }
  }

  let outcome = if report.failures.is_empty() {
    ReconcileOutcome::Delivered {
      order_id,
      lab_notified: report.delivered.contains(&Recipient::Lab),
    }
  } else {
    ReconcileOutcome::PartiallyDelivered {
      order_id,
      failures: report.failures.clone(),
    }
  };
  info!(outcome = ?outcome, "Webhook notifications dispatched.");

  let mut guard = ctx_data.write();
  guard.report = Some(report);
  guard.outcome = Some(outcome);
  Ok(PipelineControl::Continue)
}

pub fn build_webhook_pipeline() -> Pipeline<ReconcileCtxData, AppError> {
  let mut p = Pipeline::<ReconcileCtxData, AppError>::new(&[
    ("filter_event_type", false, None),
    ("extract_order_id", false, None),
    ("ensure_paypal_configured", false, None),
    ("acquire_access_token", false, None),
    ("fetch_order", false, None),
    ("resolve_customer", false, None),
    ("compose_notifications", false, None),
    ("dispatch_notifications", false, None),
  ]);

  p.on_root("filter_event_type", filter_event_type);
  p.on_root("extract_order_id", extract_order_id);
  p.on_root("ensure_paypal_configured", ensure_paypal_configured_step::<ReconcileCtxData>);
  p.on_root("acquire_access_token", acquire_access_token_step::<ReconcileCtxData>);
  p.on_root("fetch_order", fetch_order);
  p.on_root("resolve_customer", resolve_customer);
  p.on_root("compose_notifications", compose_notifications);
  p.on_root("dispatch_notifications", dispatch_notifications);
  p
}

pub fn register_webhook_pipeline(flows: &Registry<AppError>) {
  flows.register_pipeline(build_webhook_pipeline());
  info!("Webhook pipeline registered.");
}
