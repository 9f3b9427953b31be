// tests/config_tests.rs
mod common;

use common::config_from;
use filmlab_pay::config::{AppConfig, PayPalEnvironment, PAYPAL_LIVE_API, PAYPAL_SANDBOX_API};
use filmlab_pay::errors::AppError;
use serial_test::serial;

#[test]
fn defaults_to_sandbox_and_local_bind() {
  common::setup_tracing();
  let config = config_from(&[]);
  assert_eq!(config.server_host, "127.0.0.1");
  assert_eq!(config.server_port, 8080);
  assert_eq!(config.paypal.environment, PayPalEnvironment::Sandbox);
  assert_eq!(config.paypal.api_base_url, PAYPAL_SANDBOX_API);
  assert_eq!(config.brand_name, "Analog Film Lab");
  assert_eq!(config.public_site_url, None);
}

#[test]
fn live_is_selected_only_by_name() {
  common::setup_tracing();
  assert_eq!(config_from(&[("PAYPAL_ENV", "LIVE")]).paypal.api_base_url, PAYPAL_LIVE_API);
  assert_eq!(config_from(&[("PAYPAL_ENV", "production")]).paypal.api_base_url, PAYPAL_SANDBOX_API);
}

#[test]
fn credentials_require_both_halves() {
  common::setup_tracing();
  let only_id = config_from(&[("PAYPAL_CLIENT_ID", "id"), ("PAYPAL_SECRET", "  ")]);
  assert!(matches!(only_id.paypal.credentials(), Err(AppError::Config(_))));

  let both = config_from(&[("PAYPAL_CLIENT_ID", "id"), ("PAYPAL_SECRET", "s3cret")]);
  let creds = both.paypal.credentials().unwrap();
  assert_eq!(creds.client_id, "id");
  assert!(!format!("{:?}", creds).contains("s3cret"));
  assert!(!format!("{:?}", both).contains("s3cret"));
}

#[test]
fn site_url_prefers_url_over_deploy_prime_url() {
  common::setup_tracing();
  let config = config_from(&[("URL", "https://filmlab.example/"), ("DEPLOY_PRIME_URL", "https://preview.example")]);
  assert_eq!(config.public_site_url.as_deref(), Some("https://filmlab.example"));
}

#[test]
fn sender_defaults_to_the_lab_address() {
  common::setup_tracing();
  let config = config_from(&[("LAB_EMAIL", "lab@filmlab.test")]);
  assert_eq!(config.mail.from_email.as_deref(), Some("lab@filmlab.test"));

  let config = config_from(&[("LAB_EMAIL", "lab@filmlab.test"), ("FROM_EMAIL", "noreply@filmlab.test")]);
  assert_eq!(config.mail.from_email.as_deref(), Some("noreply@filmlab.test"));
}

#[test]
fn invalid_port_is_a_configuration_error() {
  common::setup_tracing();
  let result = AppConfig::from_lookup(|key| (key == "SERVER_PORT").then(|| "eighty".to_string()));
  assert!(matches!(result, Err(AppError::Config(_))));
}

#[test]
#[serial]
fn from_env_reads_the_process_environment() {
  common::setup_tracing();
  std::env::set_var("BRAND_NAME", "Darkroom Test Lab");
  std::env::set_var("SERVER_PORT", "9191");
  let config = AppConfig::from_env().unwrap();
  std::env::remove_var("BRAND_NAME");
  std::env::remove_var("SERVER_PORT");

  assert_eq!(config.brand_name, "Darkroom Test Lab");
  assert_eq!(config.server_port, 9191);
}
