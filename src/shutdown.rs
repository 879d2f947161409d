//! Process-wide cancellation with a reason code
//!
//! Every dispatcher holds a clone of the same [`ShutdownSignal`]. The first
//! call to [`ShutdownSignal::trigger`] records why the process is stopping;
//! later calls are ignored. Dispatchers poll the signal between event waits,
//! and the main thread awaits it.

use std::sync::Arc;

use tokio::sync::watch;

/// Why the watch set is stopping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    /// Ctrl-C or an explicit stop request
    UserStop,
    /// An unrecoverable error in one dispatcher
    Fatal(String),
}

impl ShutdownReason {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

/// Shared cancellation signal
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<Option<ShutdownReason>>>,
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Request shutdown. Returns false if a reason was already recorded.
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        let mut accepted = false;
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            tracing::info!("shutdown requested: {:?}", reason);
            *current = Some(reason.clone());
            accepted = true;
            true
        });
        accepted
    }

    pub fn is_triggered(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// The recorded reason, if shutdown was requested
    pub fn reason(&self) -> Option<ShutdownReason> {
        self.tx.borrow().clone()
    }

    /// Wait until shutdown is requested and return the reason
    pub async fn wait(&self) -> ShutdownReason {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let reason = match rx.wait_for(Option::is_some).await {
            Ok(reason) => reason.clone().unwrap_or(ShutdownReason::UserStop),
            Err(_) => ShutdownReason::UserStop,
        };
        reason
    }
}
