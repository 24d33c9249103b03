// Scheduler Shutdown Token

use tokio::sync::watch;

/// Shutdown signal for graceful termination
#[derive(Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl ShutdownToken {
    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for shutdown signal (returns at once if already signalled)
    pub async fn wait(&mut self) {
        let _ = self.rx.wait_for(|stop| *stop).await;
    }
}

/// Shutdown sender
pub struct ShutdownSender {
    tx: watch::Sender<bool>,
}

impl ShutdownSender {
    /// Signal shutdown to every token holder
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

/// Create a shutdown channel
pub fn shutdown_channel() -> (ShutdownSender, ShutdownToken) {
    let (tx, rx) = watch::channel(false);
    (ShutdownSender { tx }, ShutdownToken { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_returns_after_signal() {
        let (tx, mut token) = shutdown_channel();
        assert!(!token.is_shutdown());

        tx.shutdown();
        token.wait().await;
        assert!(token.is_shutdown());

        // Waiting again on an already-stopped token does not hang
        token.wait().await;
    }
}
