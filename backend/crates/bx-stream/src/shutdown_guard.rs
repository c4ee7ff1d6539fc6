use tokio::sync::watch;

/// Per-task view of the shutdown signal
pub struct ShutdownGuard {
    shutdown_rx: watch::Receiver<bool>,
}

impl ShutdownGuard {
    pub(crate) fn new(shutdown_rx: watch::Receiver<bool>) -> Self {
        Self { shutdown_rx }
    }

    /// Wait for shutdown signal. Returns immediately once triggered, so it
    /// is safe to call from every iteration of a select loop.
    pub async fn wait(&mut self) {
        // A dropped coordinator counts as shutdown
        let _ = self.shutdown_rx.wait_for(|triggered| *triggered).await;
    }

    /// Non-blocking check
    pub fn is_triggered(&self) -> bool {
        *self.shutdown_rx.borrow()
    }
}
