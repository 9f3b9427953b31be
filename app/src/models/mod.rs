// filmlab_pay/src/models/mod.rs

pub mod amount;
pub mod metadata;
pub mod paypal;
pub mod requests;
pub mod sendgrid;

pub use amount::ChargeAmount;
pub use metadata::{OrderMetadata, RollCount};
