// filmlab_pay/src/models/metadata.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order context carried through PayPal in the purchase unit's `custom_id`.
///
/// Built once when the order is created and read back once by the webhook.
/// Nothing here is stored locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMetadata {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  pub email: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub film: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rolls: Option<RollCount>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub service_text: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub amount: Option<String>,
}

impl OrderMetadata {
  pub fn new(email: impl Into<String>) -> Self {
    Self {
      name: None,
      email: email.into(),
      film: None,
      rolls: None,
      service_text: None,
      amount: None,
    }
  }
}

/// Roll quantity as the order form sent it: a number or free text ("2-3").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RollCount {
  Count(serde_json::Number),
  Text(String),
}

impl RollCount {
  /// Maps an arbitrary form value. Zero, empty text and non-scalar values
  /// carry no quantity.
  pub fn from_value(value: &serde_json::Value) -> Option<Self> {
    match value {
      serde_json::Value::Number(n) if n.as_f64() != Some(0.0) => Some(RollCount::Count(n.clone())),
      serde_json::Value::String(s) if !s.is_empty() => Some(RollCount::Text(s.clone())),
      _ => None,
    }
  }
}

impl fmt::Display for RollCount {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RollCount::Count(n) => write!(f, "{}", n),
      RollCount::Text(s) => f.write_str(s),
    }
  }
}
