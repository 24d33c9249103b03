// Port Layer - Interfaces for external dependencies

pub mod delivery;
pub mod message_queue;
pub mod time_provider; // For deterministic testing

// Re-exports
pub use delivery::{DeliveryError, DeliveryPort};
pub use message_queue::MessageQueue;
pub use time_provider::TimeProvider;
