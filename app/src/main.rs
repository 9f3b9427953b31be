// filmlab_pay/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use filmlab_pay::config::AppConfig;
use filmlab_pay::services::{PayPalClient, SendGridMailer};
use anyhow::Context;
use filmlab_pay::{build_app_state, http_client, web};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let subscriber = tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE);
  // LOG_FORMAT=json for hosted deploys whose log drains expect one object per line.
  if std::env::var("LOG_FORMAT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false) {
    subscriber.json().init();
  } else {
    subscriber.init();
  }

  tracing::info!("Starting film lab checkout server...");

  let app_config = AppConfig::from_env()
    .inspect_err(|e| tracing::error!(error = %e, "Failed to load application configuration."))
    .context("loading configuration")?;

  let http = http_client()?;

  let payments = Arc::new(PayPalClient::new(http.clone(), app_config.paypal.api_base_url.clone()));
  let mailer = Arc::new(SendGridMailer::new(http, &app_config.mail, app_config.brand_name.clone()));

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  let app_state = build_app_state(app_config, payments, mailer);

  tracing::info!("Attempting to bind server to {}...", server_address);
  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("binding {}", server_address))?
  .run()
  .await
  .context("running the HTTP server")
}
