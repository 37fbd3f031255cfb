//! Per-window input history with a navigation cursor.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::window::WindowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Message,
    Command,
}

/// Input text together with the mode it was typed in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModedText {
    pub mode: InputMode,
    pub text: String,
}

impl ModedText {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            mode: InputMode::Message,
            text: text.into(),
        }
    }

    pub fn command(text: impl Into<String>) -> Self {
        Self {
            mode: InputMode::Command,
            text: text.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Default)]
struct Histories {
    entries: HashMap<WindowId, Vec<ModedText>>,
    cursors: HashMap<WindowId, usize>,
}

impl Histories {
    fn current(&mut self, win: WindowId) -> ModedText {
        let list = self.entries.entry(win).or_default();
        let cursor = self.cursors.entry(win).or_insert(list.len());
        *cursor = (*cursor).min(list.len());
        list.get(*cursor).cloned().unwrap_or_default()
    }
}

/// Input history for every window.
///
/// The cursor ranges over `0..=len`; `len` is the blank line after the newest
/// entry.
#[derive(Debug, Default)]
pub struct HistoryManager {
    inner: Mutex<Histories>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Histories> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a submitted entry and move the cursor past it.
    pub fn append(&self, win: WindowId, entry: ModedText) {
        let mut h = self.lock();
        let list = h.entries.entry(win).or_default();
        list.push(entry);
        let len = list.len();
        h.cursors.insert(win, len);
    }

    /// Store an unsent draft at the cursor, unless it equals the entry already
    /// there.
    pub fn insert(&self, win: WindowId, entry: ModedText) {
        let mut h = self.lock();
        if h.current(win) == entry {
            return;
        }
        let cursor = h.cursors.get(&win).copied().unwrap_or(0);
        h.entries.entry(win).or_default().insert(cursor, entry);
    }

    pub fn current(&self, win: WindowId) -> ModedText {
        self.lock().current(win)
    }

    pub fn previous(&self, win: WindowId) -> ModedText {
        let mut h = self.lock();
        h.current(win);
        if let Some(cursor) = h.cursors.get_mut(&win) {
            *cursor = cursor.saturating_sub(1);
        }
        h.current(win)
    }

    pub fn next(&self, win: WindowId) -> ModedText {
        let mut h = self.lock();
        h.current(win);
        if let Some(cursor) = h.cursors.get_mut(&win) {
            *cursor += 1;
        }
        h.current(win)
    }

    pub fn forget(&self, win: WindowId) {
        let mut h = self.lock();
        h.entries.remove(&win);
        h.cursors.remove(&win);
    }

    pub fn len(&self, win: WindowId) -> usize {
        self.lock().entries.get(&win).map_or(0, Vec::len)
    }
}
