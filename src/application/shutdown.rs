// Cooperative stop signal for paced runs
use tokio::sync::watch;

/// Sending half, held by whoever decides the run should stop.
#[derive(Debug, Clone)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        // send_replace never fails, even with no receivers left
        self.tx.send_replace(true);
    }
}

/// Receiving half, polled by the run loop.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn channel() -> (ShutdownTrigger, Shutdown) {
        let (tx, rx) = watch::channel(false);
        (ShutdownTrigger { tx }, Shutdown { rx })
    }

    /// A signal that never fires
    #[cfg(test)]
    pub fn never() -> Shutdown {
        let (_, shutdown) = Self::channel();
        shutdown
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the signal fires. Pends forever if the trigger was dropped.
    pub async fn triggered(&mut self) {
        if self.rx.wait_for(|stop| *stop).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Trigger on Ctrl+C.
    pub fn on_ctrl_c() -> Shutdown {
        let (trigger, shutdown) = Self::channel();

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Received interrupt signal (Ctrl+C)");
                    trigger.trigger();
                }
                Err(e) => {
                    tracing::error!("Failed to install Ctrl+C handler: {}", e);
                }
            }
        });

        shutdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_is_observed() {
        let (trigger, mut shutdown) = Shutdown::channel();
        assert!(!shutdown.is_triggered());

        trigger.trigger();
        assert!(shutdown.is_triggered());
        tokio::time::timeout(Duration::from_secs(1), shutdown.triggered())
            .await
            .expect("triggered should resolve");
    }

    #[tokio::test]
    async fn test_dropped_trigger_never_fires() {
        let (trigger, mut shutdown) = Shutdown::channel();
        drop(trigger);

        assert!(!shutdown.is_triggered());
        let waited = tokio::time::timeout(Duration::from_millis(20), shutdown.triggered()).await;
        assert!(waited.is_err());
    }
}
