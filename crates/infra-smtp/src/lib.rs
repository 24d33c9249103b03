// Time Machine Infrastructure - SMTP Delivery
// Implements DeliveryPort on an async SMTP relay

mod config;
mod smtp_delivery;

pub use config::{SmtpConfig, TlsMode, DEFAULT_SMTPS_PORT, DEFAULT_SMTP_PORT, DEFAULT_SUBJECT, DEFAULT_THREAD_ID};
pub use smtp_delivery::SmtpDelivery;
