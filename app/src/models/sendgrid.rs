// filmlab_pay/src/models/sendgrid.rs

use serde::Serialize;

/// Body of `POST /v3/mail/send` for a single plain-text message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailSendRequest {
  pub personalizations: Vec<Personalization>,
  pub from: EmailAddress,
  pub subject: String,
  pub content: Vec<MailContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Personalization {
  pub to: Vec<EmailAddress>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailAddress {
  pub email: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailContent {
  #[serde(rename = "type")]
  pub content_type: String,
  pub value: String,
}

impl MailSendRequest {
  pub fn plain_text(to: &str, from: &str, from_name: &str, subject: &str, text: &str) -> Self {
    Self {
      personalizations: vec![Personalization {
        to: vec![EmailAddress {
          email: to.to_string(),
          name: None,
        }],
      }],
      from: EmailAddress {
        email: from.to_string(),
        name: Some(from_name.to_string()),
      },
      subject: subject.to_string(),
      content: vec![MailContent {
        content_type: "text/plain".to_string(),
        value: text.to_string(),
      }],
    }
  }
}
