//! Render coalescing: writers mark the session dirty, the render loop waits
//! for the marks to settle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

/// Coalescing "something changed" signal shared by every writer of session
/// state and consumed by the render loop.
///
/// Any number of [`mark`](DirtyFlag::mark) calls between two renders wake the
/// renderer once.
#[derive(Debug, Clone, Default)]
pub struct DirtyFlag {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    pending: AtomicBool,
    notify: Notify,
}

impl DirtyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self) {
        if !self.inner.pending.swap(true, Ordering::AcqRel) {
            self.inner.notify.notify_one();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.inner.pending.load(Ordering::Acquire)
    }

    /// Wait until the flag is raised, let the burst settle for `delay`, then
    /// lower it. Marks arriving during the delay are folded into this render.
    pub async fn settled(&self, delay: Duration) {
        if !self.is_pending() {
            self.inner.notify.notified().await;
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.inner.pending.store(false, Ordering::Release);
    }
}
