// filmlab_pay/src/pipelines/common_steps.rs

//! PayPal credential steps shared by all three pipelines.

use crate::config::PayPalCredentials;
use crate::errors::{AppError, Result as AppResult};
use crate::pipelines::contexts::{CaptureOrderCtxData, CreateOrderCtxData, ReconcileCtxData};
use crate::services::AccessToken;
use crate::state::AppState;
use orderflow::{ContextData, PipelineControl};
use tracing::{debug, instrument, warn};

/// Context types that talk to PayPal on behalf of a request.
pub trait PayPalSession: Send + Sync + 'static {
  fn app_state(&self) -> &AppState;
  fn credentials(&self) -> Option<&PayPalCredentials>;
  fn set_credentials(&mut self, credentials: PayPalCredentials);
  fn set_access_token(&mut self, token: AccessToken);
}

macro_rules! impl_paypal_session {
  ($($ctx:ty),+ $(,)?) => {
    $(
      impl PayPalSession for $ctx {
        fn app_state(&self) -> &AppState {
          &self.app_state
        }

        fn credentials(&self) -> Option<&PayPalCredentials> {
          self.credentials.as_ref()
        }

        fn set_credentials(&mut self, credentials: PayPalCredentials) {
          self.credentials = Some(credentials);
        }

        fn set_access_token(&mut self, token: AccessToken) {
          self.access_token = Some(token);
        }
      }
    )+
  };
}

impl_paypal_session!(CreateOrderCtxData, CaptureOrderCtxData, ReconcileCtxData);

/// Fails with a configuration error before any network call when PayPal
/// credentials are missing.
#[instrument(name = "common_step::ensure_paypal_configured", skip(ctx_data), err(Display))]
pub async fn ensure_paypal_configured_step<T: PayPalSession>(
  ctx_data: ContextData<T>,
) -> AppResult<PipelineControl> {
  let credentials = ctx_data.read().app_state().config.paypal.credentials();
  match credentials {
    Ok(credentials) => {
      ctx_data.write().set_credentials(credentials);
      Ok(PipelineControl::Continue)
    }
    Err(e) => {
      warn!(error = %e, "PayPal credentials are not configured.");
      Err(e)
    }
  }
}

#[instrument(name = "common_step::acquire_access_token", skip(ctx_data), err(Display))]
pub async fn acquire_access_token_step<T: PayPalSession>(
  ctx_data: ContextData<T>,
) -> AppResult<PipelineControl> {
  let (payments, credentials) = {
    let guard = ctx_data.read();
    let credentials = guard
      .credentials()
      .cloned()
      .ok_or_else(|| {
        AppError::Internal("access token requested before credentials were checked".to_string())
      })?;
    (guard.app_state().payments.clone(), credentials)
  };

  let token = payments.access_token(&credentials).await?;
  debug!("PayPal access token acquired.");
  ctx_data.write().set_access_token(token);
  Ok(PipelineControl::Continue)
}
