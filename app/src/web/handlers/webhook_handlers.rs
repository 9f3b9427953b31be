// filmlab_pay/src/web/handlers/webhook_handlers.rs

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::errors::AppError;
use crate::models::paypal::WebhookEvent;
use crate::models::requests::parse_body;
use crate::pipelines::contexts::{ReconcileCtxData, ReconcileOutcome};
use crate::state::AppState;
use orderflow::ContextData;

fn text(status: StatusCode, body: &'static str) -> HttpResponse {
  HttpResponse::build(status)
    .content_type("text/plain; charset=utf-8")
    .body(body)
}

/// PayPal webhook receiver. Anything short of an internal failure is
/// acknowledged with 200 so PayPal stops redelivering.
#[instrument(name = "handler::paypal_webhook", skip_all)]
pub async fn paypal_webhook_handler(
  app_state: web::Data<AppState>,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let raw: Value = parse_body(&body)?;
  // Envelopes of an unexpected shape read as "no event type" and are ignored.
  let event: WebhookEvent = serde_json::from_value(raw).unwrap_or_default();
  info!(event_id = ?event.id, event_type = ?event.event_type, "Webhook received.");

  let ctx_data = ContextData::new(ReconcileCtxData::new(app_state.get_ref().clone(), event));
  if let Err(e) = app_state.flows.run(ctx_data.clone()).await {
    error!(error = %e, "Webhook reconciliation failed.");
    return Ok(text(StatusCode::INTERNAL_SERVER_ERROR, "Server error"));
  }

  let outcome = ctx_data.read().outcome.clone();
  match outcome {
    Some(outcome) => {
      if let ReconcileOutcome::PartiallyDelivered { order_id, failures } = &outcome {
        warn!(%order_id, ?failures, "Webhook acknowledged with undelivered notifications.");
      }
      Ok(text(StatusCode::OK, outcome.ack_message()))
    }
    None => {
      error!("Webhook pipeline finished without an outcome.");
      Ok(text(StatusCode::INTERNAL_SERVER_ERROR, "Server error"))
    }
  }
}
