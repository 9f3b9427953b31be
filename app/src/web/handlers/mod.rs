// filmlab_pay/src/web/handlers/mod.rs

use actix_web::HttpResponse;

pub mod order_handlers;
pub mod webhook_handlers;

/// Any method other than POST on a function route.
pub async fn method_not_allowed() -> HttpResponse {
  HttpResponse::MethodNotAllowed()
    .content_type("text/plain; charset=utf-8")
    .body("Method Not Allowed")
}
