// filmlab_pay/src/services/mod.rs

pub mod email;
pub mod notifications;
pub mod paypal;

pub use email::{Mailer, OutgoingEmail, SendGridMailer};
pub use paypal::{AccessToken, PayPalClient, PaymentGateway};
