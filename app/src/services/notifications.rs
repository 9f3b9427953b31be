// filmlab_pay/src/services/notifications.rs

//! Texts of the two "order paid" emails.

use crate::models::paypal::{OrderDetails, CURRENCY};
use crate::models::{OrderMetadata, RollCount};
use crate::services::email::OutgoingEmail;

pub const LAB_SUBJECT: &str = "New paid film order";
const DEFAULT_GREETING_NAME: &str = "Customer";

/// Who the confirmation goes to and how to greet them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerContact {
  pub email: String,
  pub greeting_name: String,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
  value.filter(|v| !v.trim().is_empty())
}

/// Metadata email first, then whatever payer email PayPal recorded.
pub fn resolve_customer(meta: Option<&OrderMetadata>, order: &OrderDetails) -> Option<CustomerContact> {
  let email = non_empty(meta.map(|m| m.email.as_str())).or_else(|| order.payer_email())?;
  let greeting_name = non_empty(meta.and_then(|m| m.name.as_deref()))
    .or_else(|| order.payer_given_name())
    .unwrap_or(DEFAULT_GREETING_NAME);
  Some(CustomerContact {
    email: email.to_string(),
    greeting_name: greeting_name.to_string(),
  })
}

fn rolls_text(rolls: Option<&RollCount>) -> Option<String> {
  match rolls? {
    RollCount::Count(n) if n.as_f64() == Some(0.0) => None,
    RollCount::Text(s) if s.is_empty() => None,
    other => Some(other.to_string()),
  }
}

/// Plain-text block listing whatever the order carried. The email line is
/// always present.
pub fn order_summary(meta: Option<&OrderMetadata>, customer_email: &str) -> String {
  let mut summary = String::from("Order details:\n\n");
  if let Some(name) = non_empty(meta.and_then(|m| m.name.as_deref())) {
    summary.push_str(&format!("Name: {}\n", name));
  }
  summary.push_str(&format!("Email: {}\n", customer_email));
  if let Some(film) = non_empty(meta.and_then(|m| m.film.as_deref())) {
    summary.push_str(&format!("Film type: {}\n", film));
  }
  if let Some(rolls) = rolls_text(meta.and_then(|m| m.rolls.as_ref())) {
    summary.push_str(&format!("Number of rolls: {}\n", rolls));
  }
  if let Some(service) = non_empty(meta.and_then(|m| m.service_text.as_deref())) {
    summary.push_str(&format!("Service: {}\n", service));
  }
  if let Some(amount) = non_empty(meta.and_then(|m| m.amount.as_deref())) {
    summary.push_str(&format!("Total paid: {} {}\n", amount, CURRENCY));
  }
  summary
}

pub fn lab_notification(lab_email: &str, summary: &str) -> OutgoingEmail {
  OutgoingEmail {
    to: lab_email.to_string(),
    subject: LAB_SUBJECT.to_string(),
    text: summary.to_string(),
  }
}

pub fn customer_confirmation(
  customer: &CustomerContact,
  summary: &str,
  brand_name: &str,
) -> OutgoingEmail {
  OutgoingEmail {
    to: customer.email.clone(),
    subject: format!("Your {} order & payment confirmation", brand_name),
    text: format!(
      concat!(
        "Hi {},\n\n",
        "Thank you for your order and payment.\n\n",
        "{}\n",
        "We will start processing your film and get back to you when your scans are ready.\n\n",
        "– {}",
      ),
      customer.greeting_name, summary, brand_name
    ),
  }
}
