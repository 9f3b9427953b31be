// filmlab_pay/src/pipelines/mod.rs

//! Pipelines behind the three checkout functions, one per context type.

use crate::errors::AppError;
use orderflow::Registry;

pub mod common_steps;
pub mod contexts;

pub mod capture_order_pipeline;
pub mod create_order_pipeline;
pub mod webhook_pipeline;

/// Called once at startup, before the server accepts requests.
pub fn register_all_pipelines(flows: &Registry<AppError>) {
  tracing::info!("Registering pipelines...");

  create_order_pipeline::register_create_order_pipeline(flows);
  capture_order_pipeline::register_capture_order_pipeline(flows);
  webhook_pipeline::register_webhook_pipeline(flows);

  tracing::info!("All application pipelines registered.");
}
