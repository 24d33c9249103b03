// Delivery Port
// Abstraction for handing one message to the outbound mail relay

use crate::domain::Message;
use async_trait::async_trait;
use thiserror::Error;

/// Delivery errors
///
/// Delivery is all-or-nothing: any variant means the relay did not accept
/// the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Delivery Port trait
///
/// Implementations:
/// - SmtpDelivery: SMTP relay with a fixed recipient and subject
#[async_trait]
pub trait DeliveryPort: Send + Sync {
    /// Deliver one message to the configured recipient
    ///
    /// # Errors
    /// - DeliveryError::Build if the outgoing mail cannot be assembled
    /// - DeliveryError::Transport if the relay refuses or cannot be reached
    async fn send(&self, message: &Message) -> Result<(), DeliveryError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock delivery behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always accept
        Success,
        /// Always fail with message
        Fail(String),
        /// Fail only for messages with exactly this content
        FailFor(String),
    }

    /// Mock delivery port recording every attempt
    pub struct MockDelivery {
        behavior: Arc<Mutex<MockBehavior>>,
        attempts: Arc<Mutex<Vec<Message>>>,
        delivered: Arc<Mutex<Vec<Message>>>,
    }

    impl MockDelivery {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                attempts: Arc::new(Mutex::new(Vec::new())),
                delivered: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(message.into()))
        }

        pub fn new_fail_for(content: impl Into<String>) -> Self {
            Self::new(MockBehavior::FailFor(content.into()))
        }

        pub fn set_behavior(&self, behavior: MockBehavior) {
            *self.behavior.lock().unwrap() = behavior;
        }

        pub fn call_count(&self) -> usize {
            self.attempts.lock().unwrap().len()
        }

        /// Messages the mock accepted, in order
        pub fn delivered(&self) -> Vec<String> {
            self.delivered
                .lock()
                .unwrap()
                .iter()
                .map(|m| m.as_str().to_string())
                .collect()
        }
    }

    #[async_trait]
    impl DeliveryPort for MockDelivery {
        async fn send(&self, message: &Message) -> Result<(), DeliveryError> {
            self.attempts.lock().unwrap().push(message.clone());

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Success => {}
                MockBehavior::Fail(msg) => return Err(DeliveryError::Transport(msg)),
                MockBehavior::FailFor(content) if content == message.as_str() => {
                    return Err(DeliveryError::Transport(format!(
                        "rejected '{}'",
                        content
                    )))
                }
                MockBehavior::FailFor(_) => {}
            }

            self.delivered.lock().unwrap().push(message.clone());
            Ok(())
        }
    }
}
