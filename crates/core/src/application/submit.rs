// Submit Use Case - producer path into the queue

use crate::domain::{DomainError, Message};
use crate::error::Result;
use crate::port::MessageQueue;
use tracing::info;

/// Upper bound on one reminder body
pub const MAX_MESSAGE_BYTES: usize = 64 * 1024;

/// Reject messages that could never make a useful reminder
pub fn validate_message(message: &Message) -> std::result::Result<(), DomainError> {
    if message.is_blank() {
        return Err(DomainError::InvalidMessage(
            "message cannot be empty".to_string(),
        ));
    }

    if message.len() > MAX_MESSAGE_BYTES {
        return Err(DomainError::InvalidMessage(format!(
            "message too long ({} bytes, max {})",
            message.len(),
            MAX_MESSAGE_BYTES
        )));
    }

    Ok(())
}

/// Validate and append one message, returning the queue length afterwards
///
/// The text is stored as given (no trimming).
pub async fn execute(queue: &dyn MessageQueue, text: String) -> Result<usize> {
    let message = Message::new(text);
    validate_message(&message)?;

    let bytes = message.len();
    queue.add(message).await?;

    let queue_length = queue.len().await;
    info!(message_bytes = bytes, queue_length, "Message added to queue");
    Ok(queue_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::port::message_queue::mocks::InMemoryQueue;

    #[test]
    fn test_validate_blank() {
        assert!(validate_message(&Message::new("")).is_err());
        assert!(validate_message(&Message::new("  \n\t ")).is_err());
        assert!(validate_message(&Message::new(" stretch ")).is_ok());
    }

    #[test]
    fn test_validate_too_long() {
        let err = validate_message(&Message::new("a".repeat(MAX_MESSAGE_BYTES + 1))).unwrap_err();
        assert!(err.to_string().contains("too long"));
        assert!(validate_message(&Message::new("a".repeat(MAX_MESSAGE_BYTES))).is_ok());
    }

    #[tokio::test]
    async fn test_execute_appends_verbatim() {
        let queue = InMemoryQueue::with_messages(["first"]);

        let len = execute(&queue, "  second  ".to_string()).await.unwrap();

        assert_eq!(len, 2);
        assert_eq!(queue.contents(), vec!["first", "  second  "]);
    }

    #[tokio::test]
    async fn test_execute_rejects_blank_without_writing() {
        let queue = InMemoryQueue::new();

        let err = execute(&queue, "   ".to_string()).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Domain(DomainError::InvalidMessage(_))
        ));
        assert_eq!(queue.add_calls(), 0);
    }

    #[tokio::test]
    async fn test_execute_surfaces_storage_failure() {
        let queue = InMemoryQueue::new();
        queue.set_fail_writes(true);

        let err = execute(&queue, "hello".to_string()).await.unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert!(queue.contents().is_empty());
    }
}
