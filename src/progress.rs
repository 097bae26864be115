//! Progress reporting for background operations.
//!
//! Every triggered operation is fire-and-forget from the caller's
//! perspective: results and status flow through an event channel instead of
//! return values, so the presentation layer observes without coupling to
//! execution mechanics.

use tokio::sync::mpsc;

/// Observational callback handed down to fetchers and parsers.
/// Receives human-readable status strings at each phase.
pub type ProgressFn = dyn Fn(&str) + Send + Sync;

/// Events emitted by long-running operations.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Human-readable phase update.
    Status(String),
    /// A single record or page in a batch failed and was skipped.
    ItemFailed { id: i64, reason: String },
    /// The operation ran to completion.
    Completed {
        operation: String,
        processed: usize,
        failed: usize,
    },
}

/// Cloneable sender half used by the orchestrator. A disabled sender drops
/// all events, letting library callers ignore progress entirely.
#[derive(Clone)]
pub struct ProgressSender {
    tx: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl ProgressSender {
    /// Create a connected sender/receiver pair.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sender that discards everything.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    pub fn status(&self, message: impl Into<String>) {
        self.emit(ProgressEvent::Status(message.into()));
    }

    pub fn item_failed(&self, id: i64, reason: impl Into<String>) {
        self.emit(ProgressEvent::ItemFailed {
            id,
            reason: reason.into(),
        });
    }

    pub fn completed(&self, operation: &str, processed: usize, failed: usize) {
        self.emit(ProgressEvent::Completed {
            operation: operation.to_string(),
            processed,
            failed,
        });
    }
}
