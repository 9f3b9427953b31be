// filmlab_pay/src/lib.rs

//! Checkout functions for the film lab: create a PayPal order, capture it,
//! and send the "order paid" emails when PayPal's webhook arrives.

pub mod codec;
pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod web;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::services::{Mailer, PaymentGateway};
use crate::state::AppState;
use anyhow::Context;
use orderflow::Registry;
use std::sync::Arc;

/// Outbound client shared by the PayPal and SendGrid integrations.
pub fn http_client() -> anyhow::Result<reqwest::Client> {
  reqwest::Client::builder()
    .use_rustls_tls()
    .build()
    .context("building the outbound HTTP client")
}

/// Wires collaborators into an `AppState` and registers every pipeline.
pub fn build_app_state(
  config: AppConfig,
  payments: Arc<dyn PaymentGateway>,
  mailer: Arc<dyn Mailer>,
) -> AppState {
  let flows = Arc::new(Registry::<AppError>::new());
  pipelines::register_all_pipelines(&flows);
  AppState {
    flows,
    config: Arc::new(config),
    payments,
    mailer,
  }
}
