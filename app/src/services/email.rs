// filmlab_pay/src/services/email.rs

use crate::config::MailConfig;
use crate::errors::{AppError, Result, UpstreamOp};
use crate::models::sendgrid::MailSendRequest;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
  pub to: String,
  pub subject: String,
  pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}

/// Plain-text mail through SendGrid's v3 send endpoint.
#[derive(Clone)]
pub struct SendGridMailer {
  http: Client,
  api_url: String,
  api_key: Option<String>,
  from_email: Option<String>,
  from_name: String,
}

impl SendGridMailer {
  pub fn new(http: Client, config: &MailConfig, from_name: impl Into<String>) -> Self {
    Self {
      http,
      api_url: config.api_url.clone(),
      api_key: config.sendgrid_api_key.clone(),
      from_email: config.from_email.clone(),
      from_name: from_name.into(),
    }
  }
}

#[async_trait]
impl Mailer for SendGridMailer {
  #[instrument(
    name = "sendgrid::send",
    skip_all,
    fields(to = %email.to, subject = %email.subject),
    err(Display)
  )]
  async fn send(&self, email: &OutgoingEmail) -> Result<()> {
    let (api_key, from_email) = match (&self.api_key, &self.from_email) {
      (Some(key), Some(from)) => (key, from),
      _ => return Err(AppError::Config("SENDGRID_API_KEY or FROM_EMAIL is not set".to_string())),
    };

    let body =
      MailSendRequest::plain_text(&email.to, from_email, &self.from_name, &email.subject, &email.text);
    let response = self
      .http
      .post(&self.api_url)
      .bearer_auth(api_key)
      .json(&body)
      .send()
      .await
      .map_err(|e| AppError::upstream(UpstreamOp::SendMail, None, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      let text = response.text().await.unwrap_or_default();
      error!(status = status.as_u16(), body = %text, "SendGrid rejected the message.");
      return Err(AppError::upstream(UpstreamOp::SendMail, Some(status.as_u16()), text));
    }
    info!("Email accepted by SendGrid.");
    Ok(())
  }
}
