// filmlab_pay/src/codec.rs

//! Packs `OrderMetadata` into PayPal's `custom_id` and reads it back.
//!
//! The token is the metadata's compact JSON, percent-encoded the way browsers
//! encode a URI component. PayPal caps `custom_id` at 127 characters; when the
//! full record does not fit, only the encoded email is kept. That loss is
//! accepted: the webhook can still reach the customer.

use crate::models::OrderMetadata;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::{debug, warn};

pub const CUSTOM_ID_MAX_LEN: usize = 127;

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
  .remove(b'-')
  .remove(b'_')
  .remove(b'.')
  .remove(b'!')
  .remove(b'~')
  .remove(b'*')
  .remove(b'\'')
  .remove(b'(')
  .remove(b')');

pub fn encode_uri_component(input: &str) -> String {
  utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Builds the `custom_id` token. Never fails.
pub fn encode(meta: &OrderMetadata) -> String {
  if let Ok(json) = serde_json::to_string(meta) {
    let candidate = encode_uri_component(&json);
    if candidate.len() <= CUSTOM_ID_MAX_LEN {
      return candidate;
    }
    debug!(
      encoded_len = candidate.len(),
      "Order metadata too long for custom_id; keeping the email only."
    );
  } else {
    warn!("Order metadata could not be serialized; keeping the email only.");
  }

  let mut fallback = encode_uri_component(&meta.email);
  // Output is pure ASCII, so byte truncation stays on a char boundary.
  fallback.truncate(CUSTOM_ID_MAX_LEN);
  fallback
}

/// Reads a `custom_id` token back. Fallback (email-only) tokens, malformed
/// escapes and non-JSON input all yield `None`.
pub fn decode(token: &str) -> Option<OrderMetadata> {
  if token.is_empty() {
    return None;
  }
  let decoded = percent_decode_str(token).decode_utf8().ok()?;
  match serde_json::from_str::<OrderMetadata>(&decoded) {
    Ok(meta) => Some(meta),
    Err(e) => {
      debug!(error = %e, "custom_id does not hold structured order metadata.");
      None
    }
  }
}
