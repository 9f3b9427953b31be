// filmlab_pay/src/models/paypal.rs

//! PayPal REST payloads, typed at the boundary.
//!
//! Response types default every field so that a missing key shows up as
//! `None` (or an empty list) instead of a deserialization failure.

use serde::{Deserialize, Serialize};

pub const CURRENCY: &str = "EUR";
pub const CAPTURE_COMPLETED_EVENT: &str = "PAYMENT.CAPTURE.COMPLETED";

// --- Requests ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateOrderRequest {
  pub intent: String,
  pub purchase_units: Vec<PurchaseUnitRequest>,
  pub application_context: ApplicationContext,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseUnitRequest {
  pub amount: Money,
  pub custom_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Money {
  pub currency_code: String,
  pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationContext {
  pub brand_name: String,
  pub landing_page: String,
  pub user_action: String,
  pub return_url: String,
  pub cancel_url: String,
}

impl CreateOrderRequest {
  /// Single-unit capture order in EUR. `site_base_url` must not end in `/`.
  pub fn capture(value: String, custom_id: String, brand_name: &str, site_base_url: &str) -> Self {
    Self {
      intent: "CAPTURE".to_string(),
      purchase_units: vec![PurchaseUnitRequest {
        amount: Money {
          currency_code: CURRENCY.to_string(),
          value,
        },
        custom_id,
      }],
      application_context: ApplicationContext {
        brand_name: brand_name.to_string(),
        landing_page: "NO_PREFERENCE".to_string(),
        user_action: "PAY_NOW".to_string(),
        return_url: format!("{}/payment-success.html", site_base_url),
        cancel_url: format!("{}/payment-cancel.html", site_base_url),
      },
    }
  }
}

// --- Responses ---

#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenResponse {
  #[serde(default)]
  pub access_token: Option<String>,
  #[serde(default)]
  pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkDescription {
  #[serde(default)]
  pub href: Option<String>,
  #[serde(default)]
  pub rel: Option<String>,
  #[serde(default)]
  pub method: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreatedOrder {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default)]
  pub status: Option<String>,
  #[serde(default)]
  pub links: Vec<LinkDescription>,
}

impl CreatedOrder {
  /// `href` of the first link whose relation is `approve`.
  pub fn approve_link(&self) -> Option<&str> {
    self
      .links
      .iter()
      .find(|link| link.rel.as_deref() == Some("approve"))
      .and_then(|link| link.href.as_deref())
      .filter(|href| !href.is_empty())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderDetails {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default)]
  pub status: Option<String>,
  #[serde(default)]
  pub purchase_units: Vec<PurchaseUnit>,
  #[serde(default)]
  pub payer: Option<Payer>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PurchaseUnit {
  #[serde(default)]
  pub custom_id: Option<String>,
  #[serde(default)]
  pub amount: Option<ReportedAmount>,
}

/// Amount as echoed back on an order. Partial objects still parse.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReportedAmount {
  #[serde(default)]
  pub currency_code: Option<String>,
  #[serde(default)]
  pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Payer {
  #[serde(default)]
  pub email_address: Option<String>,
  #[serde(default)]
  pub name: Option<PayerName>,
  #[serde(default)]
  pub payer_info: Option<LegacyPayerInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PayerName {
  #[serde(default)]
  pub given_name: Option<String>,
  #[serde(default)]
  pub surname: Option<String>,
}

/// v1-era payer block still present on some sandbox orders.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LegacyPayerInfo {
  #[serde(default)]
  pub email: Option<String>,
}

impl OrderDetails {
  pub fn custom_id(&self) -> Option<&str> {
    self
      .purchase_units
      .first()
      .and_then(|unit| unit.custom_id.as_deref())
      .filter(|id| !id.is_empty())
  }

  /// Payer email as PayPal reports it, preferring the v2 field.
  pub fn payer_email(&self) -> Option<&str> {
    let payer = self.payer.as_ref()?;
    payer
      .email_address
      .as_deref()
      .filter(|e| !e.is_empty())
      .or_else(|| {
        payer
          .payer_info
          .as_ref()
          .and_then(|info| info.email.as_deref())
          .filter(|e| !e.is_empty())
      })
  }

  pub fn payer_given_name(&self) -> Option<&str> {
    self
      .payer
      .as_ref()
      .and_then(|p| p.name.as_ref())
      .and_then(|n| n.given_name.as_deref())
      .filter(|n| !n.is_empty())
  }
}

// --- Webhooks ---

/// Envelope of an inbound webhook notification.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WebhookEvent {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default)]
  pub event_type: Option<String>,
  #[serde(default)]
  pub resource: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CaptureResource {
  #[serde(default)]
  supplementary_data: Option<SupplementaryData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SupplementaryData {
  #[serde(default)]
  related_ids: Option<RelatedIds>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RelatedIds {
  #[serde(default)]
  order_id: Option<String>,
}

impl WebhookEvent {
  pub fn is_capture_completed(&self) -> bool {
    self.event_type.as_deref() == Some(CAPTURE_COMPLETED_EVENT)
  }

  /// `resource.supplementary_data.related_ids.order_id`, if the resource has
  /// that shape. Any other shape yields `None`.
  pub fn related_order_id(&self) -> Option<String> {
    let resource = self.resource.clone()?;
    let capture: CaptureResource = serde_json::from_value(resource).ok()?;
    capture
      .supplementary_data?
      .related_ids?
      .order_id
      .filter(|id| !id.is_empty())
  }
}
