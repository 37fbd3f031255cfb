//! Delayed follow-up actions tied to the session lifetime.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::Outbound;
use crate::app::action::Action;

/// Schedules a single rejoin some time after being kicked from a group.
///
/// Pending rejoins are aborted by [`cancel_all`](RejoinScheduler::cancel_all)
/// and when the scheduler is dropped.
#[derive(Debug)]
pub struct RejoinScheduler {
    delay: Duration,
    tasks: Mutex<JoinSet<()>>,
}

impl RejoinScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn schedule(&self, group: &str, outbound: Outbound) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(group, "no async runtime; rejoin not scheduled");
            return;
        };
        let delay = self.delay;
        let channel = group.to_string();
        let mut tasks = self.lock();
        while tasks.try_join_next().is_some() {}
        tasks.spawn_on(
            async move {
                tokio::time::sleep(delay).await;
                debug!(channel, "rejoining after kick");
                outbound.send(Action::Join { channel });
            },
            &runtime,
        );
    }

    /// Rejoins still waiting for their delay to elapse.
    pub fn pending(&self) -> usize {
        let mut tasks = self.lock();
        while tasks.try_join_next().is_some() {}
        tasks.len()
    }

    pub fn cancel_all(&self) {
        let cancelled = std::mem::take(&mut *self.lock());
        // dropping a JoinSet aborts every task in it
        drop(cancelled);
    }
}
