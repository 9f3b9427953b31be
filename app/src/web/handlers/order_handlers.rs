// filmlab_pay/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{error, info, instrument};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::requests::{
  parse_body, CaptureOrderPayload, CaptureOrderResponse, CreateOrderPayload, CreateOrderResponse,
};
use crate::pipelines::contexts::{CaptureOrderCtxData, CreateOrderCtxData};
use crate::state::AppState;
use orderflow::{ContextData, PipelineResult};

/// Origin for PayPal's redirects: the configured site URL, else the scheme
/// and host the request came in on.
pub fn site_base_url(config: &AppConfig, req: &HttpRequest) -> String {
  if let Some(url) = &config.public_site_url {
    return url.clone();
  }
  let conn = req.connection_info();
  format!("{}://{}", conn.scheme(), conn.host())
}

#[instrument(name = "handler::create_order", skip_all)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let payload: CreateOrderPayload = parse_body(&body)?;
  let base_url = site_base_url(&app_state.config, &req);

  let ctx_data = ContextData::new(CreateOrderCtxData::new(app_state.get_ref().clone(), payload, base_url));
  match app_state.flows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let guard = ctx_data.read();
      match (guard.approve_url.clone(), guard.order_id.clone()) {
        (Some(approve_url), Some(order_id)) => {
          info!(%order_id, "Checkout order created.");
          Ok(HttpResponse::Ok().json(CreateOrderResponse { approve_url, order_id }))
        }
        _ => Err(AppError::Internal(
          "create-order pipeline completed without an approval link".to_string(),
        )),
      }
    }
    PipelineResult::Stopped => {
      error!("Create-order pipeline stopped before creating an order.");
      Err(AppError::Internal("create-order pipeline stopped".to_string()))
    }
  }
}

#[instrument(name = "handler::capture_order", skip_all)]
pub async fn capture_order_handler(
  app_state: web::Data<AppState>,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let payload: CaptureOrderPayload = parse_body(&body)?;

  let ctx_data = ContextData::new(CaptureOrderCtxData::new(app_state.get_ref().clone(), payload));
  let result = app_state.flows.run(ctx_data.clone()).await?;

  let guard = ctx_data.read();
  match (result, guard.capture.clone()) {
    (PipelineResult::Completed, Some(capture)) => {
      Ok(HttpResponse::Ok().json(CaptureOrderResponse::captured(capture)))
    }
    _ if guard.capture_failed => {
      let body = CaptureOrderResponse::failed("Failed to capture PayPal order");
      Ok(HttpResponse::InternalServerError().json(body))
    }
    _ => Err(AppError::Internal(
      "capture-order pipeline finished without a capture result".to_string(),
    )),
  }
}
