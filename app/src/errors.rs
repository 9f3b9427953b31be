// filmlab_pay/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use orderflow::FlowError;
use std::fmt;
use thiserror::Error;

/// Outbound call that failed, for logs and for picking the caller-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamOp {
  AccessToken,
  CreateOrder,
  CaptureOrder,
  GetOrder,
  SendMail,
}

impl fmt::Display for UpstreamOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let what = match self {
      UpstreamOp::AccessToken => "obtain PayPal access token",
      UpstreamOp::CreateOrder => "create PayPal order",
      UpstreamOp::CaptureOrder => "capture PayPal order",
      UpstreamOp::GetOrder => "fetch PayPal order",
      UpstreamOp::SendMail => "send email",
    };
    f.write_str(what)
  }
}

#[derive(Debug, Error)]
pub enum AppError {
  /// Bad client input. The message is sent back verbatim.
  #[error("{0}")]
  Validation(String),

  #[error("Invalid JSON: {0}")]
  InvalidJson(#[from] serde_json::Error),

  /// Missing credentials or other deploy-time settings.
  #[error("Configuration error: {0}")]
  Config(String),

  /// A PayPal or SendGrid call answered with a non-success status or could
  /// not be reached at all.
  #[error("Failed to {operation} (status: {status:?}): {detail}")]
  Upstream {
    operation: UpstreamOp,
    status: Option<u16>,
    detail: String,
  },

  /// The upstream answered 2xx but the payload lacks something we need.
  #[error("{0}")]
  Protocol(String),

  #[error("Workflow error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal server error: {0}")]
  Internal(String),
}

impl AppError {
  pub fn upstream(operation: UpstreamOp, status: Option<u16>, detail: impl Into<String>) -> Self {
    AppError::Upstream {
      operation,
      status,
      detail: detail.into(),
    }
  }

  /// The body text a caller sees. Internal detail stays in the logs.
  pub fn public_message(&self) -> String {
    match self {
      AppError::Validation(m) => m.clone(),
      AppError::InvalidJson(_) => "Invalid JSON".to_string(),
      AppError::Config(_) => "PayPal not configured".to_string(),
      // PayPal answered with an error status. Transport failures fall
      // through to the generic text.
      AppError::Upstream {
        operation: op @ (UpstreamOp::CreateOrder | UpstreamOp::CaptureOrder),
        status: Some(_),
        ..
      } => format!("Failed to {}", op),
      AppError::Upstream { .. } => "Server error".to_string(),
      AppError::Protocol(m) => m.clone(),
      AppError::Workflow { .. } | AppError::Internal(_) => "Server error".to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::InvalidJson(_) => StatusCode::BAD_REQUEST,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Rejecting request");
    }
    HttpResponse::build(status)
      .content_type("text/plain; charset=utf-8")
      .body(self.public_message())
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
