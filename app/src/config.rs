// filmlab_pay/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::fmt;

pub const PAYPAL_SANDBOX_API: &str = "https://api-m.sandbox.paypal.com";
pub const PAYPAL_LIVE_API: &str = "https://api-m.paypal.com";
pub const SENDGRID_SEND_API: &str = "https://api.sendgrid.com/v3/mail/send";
pub const DEFAULT_BRAND_NAME: &str = "Analog Film Lab";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayPalEnvironment {
  Sandbox,
  Live,
}

impl PayPalEnvironment {
  /// Anything other than `live` (case-insensitive) selects the sandbox.
  pub fn parse(raw: Option<&str>) -> Self {
    match raw.map(|s| s.trim().to_ascii_lowercase()) {
      Some(ref s) if s == "live" => PayPalEnvironment::Live,
      _ => PayPalEnvironment::Sandbox,
    }
  }

  pub fn api_base_url(self) -> &'static str {
    match self {
      PayPalEnvironment::Sandbox => PAYPAL_SANDBOX_API,
      PayPalEnvironment::Live => PAYPAL_LIVE_API,
    }
  }
}

/// Client id and secret, present together. Built per request from
/// `PayPalConfig::credentials`.
#[derive(Clone, PartialEq, Eq)]
pub struct PayPalCredentials {
  pub client_id: String,
  pub secret: String,
}

impl fmt::Debug for PayPalCredentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PayPalCredentials")
      .field("client_id", &self.client_id)
      .field("secret", &"[REDACTED]")
      .finish()
  }
}

#[derive(Clone)]
pub struct PayPalConfig {
  pub environment: PayPalEnvironment,
  pub api_base_url: String,
  pub client_id: Option<String>,
  pub secret: Option<String>,
}

impl PayPalConfig {
  pub fn new(environment: PayPalEnvironment, client_id: Option<String>, secret: Option<String>) -> Self {
    Self {
      environment,
      api_base_url: environment.api_base_url().to_string(),
      client_id,
      secret,
    }
  }

  /// Fails with `AppError::Config` when either half is missing. Callers use
  /// this before any network call so a misconfigured deploy never reaches
  /// PayPal.
  pub fn credentials(&self) -> Result<PayPalCredentials> {
    match (&self.client_id, &self.secret) {
      (Some(client_id), Some(secret)) => Ok(PayPalCredentials {
        client_id: client_id.clone(),
        secret: secret.clone(),
      }),
      (None, _) => Err(AppError::Config("Missing PAYPAL_CLIENT_ID".to_string())),
      (_, None) => Err(AppError::Config("Missing PAYPAL_SECRET".to_string())),
    }
  }
}

impl fmt::Debug for PayPalConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PayPalConfig")
      .field("environment", &self.environment)
      .field("api_base_url", &self.api_base_url)
      .field("client_id", &self.client_id)
      .field("secret_present", &self.secret.is_some())
      .finish()
  }
}

#[derive(Clone)]
pub struct MailConfig {
  pub api_url: String,
  pub sendgrid_api_key: Option<String>,
  /// Sender address; falls back to the lab address when unset.
  pub from_email: Option<String>,
  /// Business inbox that receives "new paid order" notices. Optional.
  pub lab_email: Option<String>,
}

impl fmt::Debug for MailConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MailConfig")
      .field("api_url", &self.api_url)
      .field("api_key_present", &self.sendgrid_api_key.is_some())
      .field("from_email", &self.from_email)
      .field("lab_email", &self.lab_email)
      .finish()
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Public site URL used for PayPal return/cancel redirects. When unset the
  /// origin of the inbound request is used instead.
  pub public_site_url: Option<String>,
  pub brand_name: String,
  pub paypal: PayPalConfig,
  pub mail: MailConfig,
}

impl AppConfig {
  /// Loads `.env` if present, then reads the process environment.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Builds the config from any key lookup. Blank values count as unset.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let server_host = get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = get("SERVER_PORT")
      .unwrap_or_else(|| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;

    let public_site_url = get("URL")
      .or_else(|| get("DEPLOY_PRIME_URL"))
      .map(|url| url.trim_end_matches('/').to_string());

    let environment = PayPalEnvironment::parse(get("PAYPAL_ENV").as_deref());
    let paypal = PayPalConfig::new(environment, get("PAYPAL_CLIENT_ID"), get("PAYPAL_SECRET"));

    let lab_email = get("LAB_EMAIL");
    let mail = MailConfig {
      api_url: SENDGRID_SEND_API.to_string(),
      sendgrid_api_key: get("SENDGRID_API_KEY"),
      from_email: get("FROM_EMAIL").or_else(|| lab_email.clone()),
      lab_email,
    };

    let brand_name = get("BRAND_NAME").unwrap_or_else(|| DEFAULT_BRAND_NAME.to_string());

    if paypal.client_id.is_none() || paypal.secret.is_none() {
      tracing::warn!("PayPal credentials are not configured; payment endpoints will answer 500.");
    }
    tracing::info!(paypal_env = ?environment, "Application configuration loaded.");

    Ok(Self {
      server_host,
      server_port,
      public_site_url,
      brand_name,
      paypal,
      mail,
    })
  }
}
