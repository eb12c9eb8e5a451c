//! Completion counting for concurrent dispatches.
//!
//! A `CompletionCounter` hands out one `CompletionSignal` per dispatch. A
//! signal is released exactly once: explicitly via `done`, or on drop if the
//! owning task exits any other way (including a panic). `wait` resolves once
//! every handed-out signal has been released.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    pending: AtomicUsize,
    notify: Notify,
}

/// Caller side of the join point. Cheap to clone; clones share the count.
#[derive(Debug, Clone, Default)]
pub struct CompletionCounter {
    inner: Arc<Inner>,
}

impl CompletionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one more expected completion.
    pub fn signal(&self) -> CompletionSignal {
        self.inner.pending.fetch_add(1, Ordering::AcqRel);
        CompletionSignal {
            inner: Some(self.inner.clone()),
        }
    }

    /// Signals handed out and not yet released.
    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::Acquire)
    }

    /// Wait until every handed-out signal has been released. Returns
    /// immediately when nothing is pending.
    pub async fn wait(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a release in between is not missed.
            notified.as_mut().enable();

            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// One dispatch's share of a `CompletionCounter`.
#[derive(Debug)]
#[must_use = "dropping a CompletionSignal releases it immediately"]
pub struct CompletionSignal {
    inner: Option<Arc<Inner>>,
}

impl CompletionSignal {
    /// A signal attached to no counter, for callers that don't need a join.
    pub fn detached() -> Self {
        Self { inner: None }
    }

    /// Release this signal.
    pub fn done(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(inner) = self.inner.take() {
            if inner.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
                inner.notify.notify_waiters();
            }
        }
    }
}

impl Drop for CompletionSignal {
    fn drop(&mut self) {
        self.release();
    }
}
