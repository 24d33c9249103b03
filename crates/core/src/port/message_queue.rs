// Message Queue Port (Interface)

use crate::domain::Message;
use crate::error::Result;
use async_trait::async_trait;

/// Durable FIFO queue of pending messages
///
/// Every operation is serialized against every other on the same instance.
/// A mutation is complete only once the persisted copy reflects it.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Append a message to the tail and persist
    async fn add(&self, message: Message) -> Result<()>;

    /// Remove and return the head, persisting the shortened queue
    ///
    /// # Errors
    /// - `DomainError::EmptyQueue` when nothing is pending (no write happens)
    /// - `AppError::Storage` when the shortened queue cannot be persisted
    async fn pop(&self) -> Result<Message>;

    /// Check if the queue has no pending messages
    async fn is_empty(&self) -> bool;

    /// Number of pending messages
    async fn len(&self) -> usize;

    /// Copy of the pending messages, head first
    async fn snapshot(&self) -> Vec<Message>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::DomainError;
    use crate::error::AppError;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory queue with injectable write failures
    #[derive(Default)]
    pub struct InMemoryQueue {
        messages: Mutex<VecDeque<Message>>,
        fail_writes: AtomicBool,
        pop_calls: AtomicUsize,
        add_calls: AtomicUsize,
    }

    impl InMemoryQueue {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_messages<I, M>(messages: I) -> Self
        where
            I: IntoIterator<Item = M>,
            M: Into<Message>,
        {
            let queue = Self::new();
            queue
                .messages
                .lock()
                .unwrap()
                .extend(messages.into_iter().map(Into::into));
            queue
        }

        /// Make every subsequent `add`/`pop` fail as if the disk write failed
        pub fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        pub fn pop_calls(&self) -> usize {
            self.pop_calls.load(Ordering::SeqCst)
        }

        pub fn add_calls(&self) -> usize {
            self.add_calls.load(Ordering::SeqCst)
        }

        /// Contents as plain strings (for assertions)
        pub fn contents(&self) -> Vec<String> {
            self.messages
                .lock()
                .unwrap()
                .iter()
                .map(|m| m.as_str().to_string())
                .collect()
        }

        fn check_write(&self) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(AppError::Storage("mock write failure".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl MessageQueue for InMemoryQueue {
        async fn add(&self, message: Message) -> Result<()> {
            self.add_calls.fetch_add(1, Ordering::SeqCst);
            self.check_write()?;
            self.messages.lock().unwrap().push_back(message);
            Ok(())
        }

        async fn pop(&self) -> Result<Message> {
            self.pop_calls.fetch_add(1, Ordering::SeqCst);
            let mut messages = self.messages.lock().unwrap();
            if messages.is_empty() {
                return Err(DomainError::EmptyQueue.into());
            }
            self.check_write()?;
            messages.pop_front().ok_or(AppError::Domain(DomainError::EmptyQueue))
        }

        async fn is_empty(&self) -> bool {
            self.messages.lock().unwrap().is_empty()
        }

        async fn len(&self) -> usize {
            self.messages.lock().unwrap().len()
        }

        async fn snapshot(&self) -> Vec<Message> {
            self.messages.lock().unwrap().iter().cloned().collect()
        }
    }
}
