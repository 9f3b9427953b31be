// filmlab_pay/src/web/routes.rs

use crate::web::handlers::{method_not_allowed, order_handlers, webhook_handlers};
use actix_web::{web, HttpResponse};

/// Mount prefix the static site's forms post to.
pub const FUNCTIONS_PREFIX: &str = "/.netlify/functions";

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// A POST-only function route, reachable both at `/<name>` and under the
/// functions prefix.
fn function_resource<F, Args>(name: &str, handler: F) -> actix_web::Resource
where
  F: actix_web::Handler<Args>,
  Args: actix_web::FromRequest + 'static,
  F::Output: actix_web::Responder + 'static,
{
  web::resource(vec![format!("/{}", name), format!("{}/{}", FUNCTIONS_PREFIX, name)])
    .route(web::post().to(handler))
    .default_service(web::to(method_not_allowed))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(health_check_handler))
    .service(function_resource("create-order", order_handlers::create_order_handler))
    .service(function_resource("capture-order", order_handlers::capture_order_handler))
    .service(function_resource("paypal-webhook", webhook_handlers::paypal_webhook_handler));
}
