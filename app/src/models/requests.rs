// filmlab_pay/src/models/requests.rs

//! Inbound request bodies and outbound JSON responses of the HTTP handlers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Checkout form as posted by the site. Fields stay loosely typed here and
/// are validated by the create-order pipeline.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
  #[serde(default)]
  pub name: Option<Value>,
  #[serde(default)]
  pub email: Option<Value>,
  #[serde(default)]
  pub amount: Option<Value>,
  #[serde(default)]
  pub film: Option<Value>,
  #[serde(default)]
  pub rolls: Option<Value>,
  #[serde(default)]
  pub service_text: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOrderPayload {
  #[serde(default)]
  pub order_id: Option<Value>,
  /// PayPal appends the order id as `?token=` to the return URL; the success
  /// page may forward it under that name.
  #[serde(default)]
  pub token: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
  pub approve_url: String,
  pub order_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureOrderResponse {
  pub ok: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub capture: Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

impl CaptureOrderResponse {
  pub fn captured(capture: Value) -> Self {
    Self {
      ok: true,
      capture: Some(capture),
      message: None,
    }
  }

  pub fn failed(message: impl Into<String>) -> Self {
    Self {
      ok: false,
      capture: None,
      message: Some(message.into()),
    }
  }
}

/// Parses a handler body. Well-formed JSON that is not an object (`null`,
/// arrays, scalars) carries no fields and yields `T::default()`.
pub fn parse_body<T>(bytes: &[u8]) -> crate::errors::Result<T>
where
  T: for<'de> Deserialize<'de> + Default,
{
  let value: Value = serde_json::from_slice(bytes)?;
  match value {
    object @ Value::Object(_) => Ok(serde_json::from_value(object)?),
    _ => Ok(T::default()),
  }
}

/// Null, `false`, `""` and `0` are all "not filled in". Whitespace is a
/// value.
pub fn is_filled(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::String(s) => !s.is_empty(),
    Value::Number(n) => n.as_f64() != Some(0.0),
    _ => true,
  }
}

/// Text of a form field the way a browser form would send it: non-empty
/// strings as-is, non-zero numbers in their JSON spelling, anything else
/// counts as absent.
pub fn field_text(value: Option<&Value>) -> Option<String> {
  match value? {
    Value::String(s) if !s.is_empty() => Some(s.clone()),
    Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
    _ => None,
  }
}
