//! Session state shared by the terminal front-end, the connection reader and
//! scheduled follow-ups.

pub mod completion;
pub mod history;
pub mod manager;
pub mod names;
pub mod reconcile;
pub mod roster;
pub mod scheduler;
pub mod signal;
pub mod window;

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::app::action::Action;
use crate::config::model::{BehaviorConfig, UiConfig};
use history::HistoryManager;
use manager::WindowManager;
use names::NamesAggregator;
use scheduler::RejoinScheduler;
use signal::DirtyFlag;
use window::WindowHandle;

/// Sending half of the outbound action queue. Sends never block.
#[derive(Debug, Clone)]
pub struct Outbound {
    tx: mpsc::UnboundedSender<Action>,
}

impl Outbound {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, action: Action) {
        if let Err(e) = self.tx.send(action) {
            warn!(action = e.0.label(), "transport is gone; dropping outbound action");
        }
    }
}

#[derive(Debug)]
pub struct Session {
    identity: RwLock<String>,
    windows: WindowManager,
    history: HistoryManager,
    names: NamesAggregator,
    rejoins: RejoinScheduler,
    outbound: Outbound,
    dirty: DirtyFlag,
    behavior: BehaviorConfig,
}

impl Session {
    pub fn new(behavior: BehaviorConfig, ui: &UiConfig, outbound: Outbound, dirty: DirtyFlag) -> Self {
        Self {
            identity: RwLock::new(String::new()),
            windows: WindowManager::with_scrollback(dirty.clone(), ui.max_scrollback),
            history: HistoryManager::new(),
            names: NamesAggregator::new(),
            rejoins: RejoinScheduler::new(Duration::from_secs(behavior.rejoin_delay_secs)),
            outbound,
            dirty,
            behavior,
        }
    }

    /// The local nickname; empty while disconnected.
    pub fn nickname(&self) -> String {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_nickname(&self, nick: &str) {
        *self.identity.write().unwrap_or_else(PoisonError::into_inner) = nick.to_string();
        self.dirty.mark();
    }

    /// Swap the identity from `old` to `new` if `old` is us. Checked and
    /// updated under one lock.
    fn rename_self(&self, old: &str, new: &str) -> bool {
        let mut identity = self.identity.write().unwrap_or_else(PoisonError::into_inner);
        if identity.is_empty() || !identity.eq_ignore_ascii_case(old) {
            return false;
        }
        *identity = new.to_string();
        true
    }

    pub fn is_me(&self, nick: &str) -> bool {
        let identity = self.identity.read().unwrap_or_else(PoisonError::into_inner);
        !identity.is_empty() && identity.eq_ignore_ascii_case(nick)
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn names(&self) -> &NamesAggregator {
        &self.names
    }

    pub fn rejoins(&self) -> &RejoinScheduler {
        &self.rejoins
    }

    pub fn behavior(&self) -> &BehaviorConfig {
        &self.behavior
    }

    pub fn dirty(&self) -> &DirtyFlag {
        &self.dirty
    }

    /// Queue an action for the transport. Returns immediately.
    pub fn send(&self, action: Action) {
        self.outbound.send(action);
    }

    /// Close `window` and drop its input history.
    pub fn close_window(&self, window: &WindowHandle) -> bool {
        match self.windows.close(window) {
            Ok(closed) => {
                self.history.forget(closed.id());
                true
            }
            Err(e) => {
                warn!(title = %window.title(), error = %e, "failed to close window");
                false
            }
        }
    }

    /// Registration finished; we are known as `nick`.
    pub fn connected(&self, nick: &str) {
        self.set_nickname(nick);
        info!(nick, "connected");
        self.windows.status().system(format!("Connected as {nick}"));
    }

    /// The connection is gone. Scheduled rejoins and partial NAMES replies
    /// belong to it and are discarded.
    pub fn disconnected(&self, reason: &str) {
        self.set_nickname("");
        self.rejoins.cancel_all();
        self.names.clear();
        info!(reason, "disconnected");
        self.windows.status().system(format!("Disconnected: {reason}"));
    }
}


#[cfg(test)]
mod tests {
    use super::testing::session;
    use super::window::WindowKind;
    use super::*;

    #[test]
    fn test_is_me_ignores_case_and_empty_identity() {
        let (session, _rx) = session("Me");
        assert!(session.is_me("me"));
        assert!(!session.is_me("you"));
        session.set_nickname("");
        assert!(!session.is_me(""));
    }

    #[test]
    fn test_send_is_queued() {
        let (session, mut rx) = session("me");
        session.send(Action::Join {
            channel: "#rust".into(),
        });
        assert!(matches!(rx.try_recv(), Ok(Action::Join { .. })));
    }

    #[test]
    fn test_send_after_transport_gone_does_not_panic() {
        let (session, rx) = session("me");
        drop(rx);
        session.send(Action::Names {
            channel: "#rust".into(),
        });
    }

    #[test]
    fn test_close_window_forgets_history() {
        let (session, _rx) = session("me");
        let (win, _) = session.windows().open(WindowKind::Group, "#rust");
        session
            .history()
            .append(win.id(), history::ModedText::message("hi"));
        assert!(session.close_window(&win));
        assert_eq!(session.history().len(win.id()), 0);
        assert!(!session.close_window(&win));
    }

    #[test]
    fn test_disconnect_clears_identity_and_names() {
        let (session, _rx) = session("me");
        session.names().push("#rust", ["a"]);
        session.disconnected("bye");
        assert_eq!(session.nickname(), "");
        assert!(!session.names().is_pending("#rust"));
        let last = session.windows().status().messages().pop().unwrap();
        assert_eq!(last.text, "Disconnected: bye");
    }
}
