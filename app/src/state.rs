// filmlab_pay/src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::services::{Mailer, PaymentGateway};
use orderflow::Registry;
use std::sync::Arc;

/// Shared by every request. Nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
  pub flows: Arc<Registry<AppError>>,
  pub config: Arc<AppConfig>,
  pub payments: Arc<dyn PaymentGateway>,
  pub mailer: Arc<dyn Mailer>,
}
