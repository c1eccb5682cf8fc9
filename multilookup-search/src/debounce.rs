//! Input debouncing.
//!
//! A [`DebounceGate`] emits a value only after input has been stable for the
//! configured delay. Every push cancels the pending timer and schedules a new
//! one, so a burst of keystrokes yields only its last value. Dropping the gate
//! cancels any pending emission.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// Delay used when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

/// Producer side: accepts raw input values.
///
/// Each push or cancel bumps a shared generation. Values are tagged with the
/// generation they were pushed under, and only the current generation is
/// ever delivered. A timer that fires on another worker after being
/// superseded therefore cannot surface its value.
pub struct DebounceGate<T> {
    delay: Duration,
    generation: Arc<AtomicU64>,
    tx: mpsc::UnboundedSender<(u64, T)>,
    pending: Option<JoinHandle<()>>,
}

/// Consumer side: yields settled values.
pub struct Debounced<T> {
    generation: Arc<AtomicU64>,
    rx: mpsc::UnboundedReceiver<(u64, T)>,
}

impl<T: Send + 'static> DebounceGate<T> {
    /// Creates a gate and its receiving half. Must be called within a tokio
    /// runtime before the first [`push`](Self::push).
    pub fn new(delay: Duration) -> (Self, Debounced<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let generation = Arc::new(AtomicU64::new(0));
        (
            Self {
                delay,
                generation: generation.clone(),
                tx,
                pending: None,
            },
            Debounced { generation, rx },
        )
    }

    /// Replaces any pending value with `value` and restarts the timer.
    pub fn push(&mut self, value: T) {
        self.cancel();
        let current = self.generation.load(Ordering::SeqCst);
        let generation = self.generation.clone();
        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) != current {
                return;
            }
            // The receiver may already be gone.
            let _ = tx.send((current, value));
        }));
    }

    /// Cancels the pending emission, and discards a settled value that has
    /// not been taken yet.
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.pending.take() {
            trace!("Cancelling pending debounce timer");
            handle.abort();
        }
    }

    /// Whether a value is waiting for its timer.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for DebounceGate<T> {
    fn drop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<T> Debounced<T> {
    /// Waits for the next settled value. Returns `None` once the gate is
    /// dropped and nothing is pending.
    pub async fn next(&mut self) -> Option<T> {
        while let Some((generation, value)) = self.rx.recv().await {
            if self.is_current(generation) {
                return Some(value);
            }
            trace!("Dropping superseded debounce value");
        }
        None
    }

    /// Returns a settled value if one is already available.
    pub fn try_next(&mut self) -> Option<T> {
        while let Ok((generation, value)) = self.rx.try_recv() {
            if self.is_current(generation) {
                return Some(value);
            }
        }
        None
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}
