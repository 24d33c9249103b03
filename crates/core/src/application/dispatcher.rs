// Dispatcher - one pop → deliver → requeue-on-failure cycle

use crate::domain::Message;
use crate::port::{DeliveryPort, MessageQueue};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of one dispatch cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing was pending
    Idle,
    /// Pop failed (queue emptied concurrently, or the write failed)
    PopFailed,
    /// Relay accepted the message; it is gone from the queue
    Delivered(Message),
    /// Delivery failed and the message went back to the tail
    Requeued(Message),
    /// Delivery failed and so did the requeue write
    Lost(Message),
}

/// Dispatcher moves the head of the queue to the delivery port
///
/// Only the scheduler calls `run_once`; producers go straight to the queue.
pub struct Dispatcher {
    queue: Arc<dyn MessageQueue>,
    delivery: Arc<dyn DeliveryPort>,
}

impl Dispatcher {
    pub fn new(queue: Arc<dyn MessageQueue>, delivery: Arc<dyn DeliveryPort>) -> Self {
        Self { queue, delivery }
    }

    /// Run one dispatch cycle
    ///
    /// Steady-state failures (empty queue, delivery failure) are handled
    /// and logged here, never returned.
    ///
    /// A failed message is re-added with the ordinary `add`, so it lands at
    /// the tail behind anything queued meanwhile.
    pub async fn run_once(&self) -> DispatchOutcome {
        if self.queue.is_empty().await {
            info!("No messages left in the queue");
            return DispatchOutcome::Idle;
        }

        let message = match self.queue.pop().await {
            Ok(message) => message,
            Err(e) if e.is_empty_queue() => {
                info!("Queue drained before pop, nothing to send");
                return DispatchOutcome::PopFailed;
            }
            Err(e) => {
                error!(error = %e, "Failed to pop message from queue");
                return DispatchOutcome::PopFailed;
            }
        };

        info!(message_bytes = message.len(), "Dispatching message");

        match self.delivery.send(&message).await {
            Ok(()) => {
                info!("Successfully sent and removed message from queue");
                DispatchOutcome::Delivered(message)
            }
            Err(send_err) => {
                warn!(error = %send_err, "Failed to send message, requeuing");
                match self.queue.add(message.clone()).await {
                    Ok(()) => DispatchOutcome::Requeued(message),
                    Err(add_err) => {
                        error!(
                            error = %add_err,
                            message = %message,
                            "Failed to add message back to queue, message lost"
                        );
                        DispatchOutcome::Lost(message)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::delivery::mocks::MockDelivery;
    use crate::port::message_queue::mocks::InMemoryQueue;

    fn dispatcher(queue: &Arc<InMemoryQueue>, delivery: &Arc<MockDelivery>) -> Dispatcher {
        Dispatcher::new(queue.clone(), delivery.clone())
    }

    #[tokio::test]
    async fn test_empty_queue_is_noop() {
        let queue = Arc::new(InMemoryQueue::new());
        let delivery = Arc::new(MockDelivery::new_success());

        let outcome = dispatcher(&queue, &delivery).run_once().await;

        assert_eq!(outcome, DispatchOutcome::Idle);
        assert_eq!(queue.pop_calls(), 0, "empty queue must not be popped");
        assert_eq!(delivery.call_count(), 0, "nothing should be sent");
        assert!(queue.contents().is_empty());
    }

    #[tokio::test]
    async fn test_success_removes_head() {
        let queue = Arc::new(InMemoryQueue::with_messages(["first", "second", "third"]));
        let delivery = Arc::new(MockDelivery::new_success());

        let outcome = dispatcher(&queue, &delivery).run_once().await;

        assert_eq!(outcome, DispatchOutcome::Delivered(Message::new("first")));
        assert_eq!(delivery.delivered(), vec!["first"]);
        assert_eq!(queue.contents(), vec!["second", "third"]);
        assert_eq!(queue.add_calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_requeues_single_message() {
        let queue = Arc::new(InMemoryQueue::with_messages(["A"]));
        let delivery = Arc::new(MockDelivery::new_fail("connection refused"));

        let outcome = dispatcher(&queue, &delivery).run_once().await;

        assert_eq!(outcome, DispatchOutcome::Requeued(Message::new("A")));
        assert_eq!(queue.contents(), vec!["A"]);
    }

    #[tokio::test]
    async fn test_failure_requeues_to_tail() {
        let queue = Arc::new(InMemoryQueue::with_messages(["A", "B"]));
        let delivery = Arc::new(MockDelivery::new_fail_for("A"));
        let dispatcher = dispatcher(&queue, &delivery);

        let outcome = dispatcher.run_once().await;
        assert_eq!(outcome, DispatchOutcome::Requeued(Message::new("A")));
        // Length unchanged, former head now last
        assert_eq!(queue.contents(), vec!["B", "A"]);

        // Next cycle delivers B, then A keeps failing in place
        assert_eq!(
            dispatcher.run_once().await,
            DispatchOutcome::Delivered(Message::new("B"))
        );
        assert_eq!(
            dispatcher.run_once().await,
            DispatchOutcome::Requeued(Message::new("A"))
        );
        assert_eq!(queue.contents(), vec!["A"]);
        assert_eq!(delivery.delivered(), vec!["B"]);
    }

    #[tokio::test]
    async fn test_pop_write_failure_keeps_message() {
        let queue = Arc::new(InMemoryQueue::with_messages(["A"]));
        queue.set_fail_writes(true);
        let delivery = Arc::new(MockDelivery::new_success());

        let outcome = dispatcher(&queue, &delivery).run_once().await;

        assert_eq!(outcome, DispatchOutcome::PopFailed);
        assert_eq!(delivery.call_count(), 0);
        assert_eq!(queue.contents(), vec!["A"]);
    }

    #[tokio::test]
    async fn test_requeue_write_failure_reports_lost() {
        let inner = Arc::new(InMemoryQueue::with_messages(["B"]));
        let delivery = Arc::new(MockDelivery::new_fail("auth rejected"));
        let dispatcher = Dispatcher::new(Arc::new(PopThenFailWrites(inner.clone())), delivery);

        let outcome = dispatcher.run_once().await;

        assert_eq!(outcome, DispatchOutcome::Lost(Message::new("B")));
        assert!(inner.contents().is_empty());
        assert_eq!(inner.add_calls(), 1, "requeue must have been attempted");
    }

    /// Queue whose writes start failing right after the first successful pop
    struct PopThenFailWrites(Arc<InMemoryQueue>);

    #[async_trait::async_trait]
    impl MessageQueue for PopThenFailWrites {
        async fn add(&self, message: Message) -> crate::error::Result<()> {
            self.0.add(message).await
        }

        async fn pop(&self) -> crate::error::Result<Message> {
            let message = self.0.pop().await?;
            self.0.set_fail_writes(true);
            Ok(message)
        }

        async fn is_empty(&self) -> bool {
            self.0.is_empty().await
        }

        async fn len(&self) -> usize {
            self.0.len().await
        }

        async fn snapshot(&self) -> Vec<Message> {
            self.0.snapshot().await
        }
    }
}
