use std::sync::Arc;
use std::time::Duration;

use docscan_types::Notification;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Default lifetime of a status message
pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

/// The live notification plus when it goes away
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNotification {
    pub notification: Notification,
    pub expires_at: Instant,
    generation: u64,
}

/// Owns the one status message shown to the user.
///
/// Every `notify` replaces the message and restarts the expiry timer. Renderers
/// follow changes through [`NotificationCenter::subscribe`].
pub struct NotificationCenter {
    ttl: Duration,
    tx: Arc<watch::Sender<Option<ActiveNotification>>>,
    expiry: Option<JoinHandle<()>>,
    generation: u64,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            ttl,
            tx: Arc::new(tx),
            expiry: None,
            generation: 0,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Must be called from inside a tokio runtime, the expiry timer is a task.
    pub fn notify(&mut self, notification: Notification) {
        self.cancel_expiry();
        self.generation += 1;

        let generation = self.generation;
        let expires_at = Instant::now() + self.ttl;

        if notification.is_error {
            tracing::warn!("[NOTIFY] {}", notification.message);
        } else {
            tracing::info!("[NOTIFY] {}", notification.message);
        }

        self.tx.send_replace(Some(ActiveNotification {
            notification,
            expires_at,
            generation,
        }));

        let tx = Arc::clone(&self.tx);
        self.expiry = Some(tokio::spawn(async move {
            tokio::time::sleep_until(expires_at).await;
            // A newer message may already sit in the slot
            tx.send_if_modified(|current| {
                let expired = current
                    .as_ref()
                    .is_some_and(|active| active.generation == generation);
                if expired {
                    *current = None;
                }
                expired
            });
        }));
    }

    pub fn clear(&mut self) {
        self.cancel_expiry();
        self.tx.send_if_modified(|current| current.take().is_some());
    }

    pub fn current(&self) -> Option<Notification> {
        self.tx
            .borrow()
            .as_ref()
            .map(|active| active.notification.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ActiveNotification>> {
        self.tx.subscribe()
    }

    fn cancel_expiry(&mut self) {
        if let Some(handle) = self.expiry.take() {
            handle.abort();
        }
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        self.cancel_expiry();
    }
}
