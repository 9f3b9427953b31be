// filmlab_pay/src/models/amount.rs

use crate::errors::{AppError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;

/// A positive charge total with exactly two fraction digits.
///
/// The same value is sent as the PayPal purchase amount and written into the
/// order metadata, so the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargeAmount(Decimal);

impl ChargeAmount {
  /// Parses the form's `amount` field, given either as a JSON string or number.
  pub fn parse(raw: &serde_json::Value) -> Result<Self> {
    let text = match raw {
      serde_json::Value::String(s) => s.trim().to_string(),
      serde_json::Value::Number(n) => n.to_string(),
      _ => return Err(invalid_amount()),
    };
    Self::from_text(&text)
  }

  pub fn from_text(text: &str) -> Result<Self> {
    let parsed = Decimal::from_str(text)
      .or_else(|_| Decimal::from_scientific(text))
      .map_err(|_| invalid_amount())?;
    if parsed <= Decimal::ZERO {
      return Err(invalid_amount());
    }

    let mut rounded = parsed.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    // 0.001 is positive but charges nothing.
    if rounded <= Decimal::ZERO {
      return Err(invalid_amount());
    }
    Ok(ChargeAmount(rounded))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }
}

impl fmt::Display for ChargeAmount {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

fn invalid_amount() -> AppError {
  AppError::Validation("Invalid amount".to_string())
}
