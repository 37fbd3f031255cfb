//! Conversation windows.
//!
//! A [`Window`] is shared as an [`Arc`] handle. Its identity and kind never
//! change; title, buffer and roster live behind a single `RwLock` so every
//! operation is atomic with respect to the others on the same window.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Local};

use super::roster::{Privilege, Roster, RosterEntry};
use super::signal::DirtyFlag;

pub const STATUS_TITLE: &str = "status";

pub type WindowHandle = Arc<Window>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        WindowId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Status,
    Group,
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Normal,
    Action,
    Notice,
    Join,
    Part,
    Quit,
    Kick,
    Nick,
    Topic,
    Mode,
    System,
    Error,
}

/// One buffer line.
#[derive(Debug, Clone)]
pub struct Message {
    pub timestamp: DateTime<Local>,
    pub sender: String,
    pub text: String,
    pub kind: MessageKind,
}

impl Message {
    pub fn new(sender: impl Into<String>, text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            timestamp: Local::now(),
            sender: sender.into(),
            text: text.into(),
            kind,
        }
    }

    /// A line with no speaker: joins, parts, renames and client notes.
    pub fn event(kind: MessageKind, text: impl Into<String>) -> Self {
        Self::new("", text, kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollCursor {
    /// Follow the newest line.
    #[default]
    Pinned,
    At(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    None,
    Unseen,
    Notice,
}

#[derive(Debug, Default)]
struct Buffer {
    messages: Vec<Message>,
    scroll: ScrollCursor,
    unseen: bool,
    notice: bool,
}

impl Buffer {
    fn push(&mut self, message: Message, limit: usize) {
        self.messages.push(message);
        if limit > 0 && self.messages.len() > limit {
            let excess = self.messages.len() - limit;
            self.messages.drain(..excess);
            if let ScrollCursor::At(pos) = self.scroll {
                self.scroll = ScrollCursor::At(pos.saturating_sub(excess));
            }
        }
        self.unseen = true;
    }

    fn current_line(&self) -> Option<usize> {
        match self.scroll {
            ScrollCursor::Pinned => self.messages.len().checked_sub(1),
            ScrollCursor::At(pos) => Some(pos),
        }
    }

    fn scroll_to(&mut self, pos: i64) {
        self.scroll = match usize::try_from(pos) {
            Ok(pos) if pos < self.messages.len() => ScrollCursor::At(pos),
            _ => ScrollCursor::Pinned,
        };
    }
}

#[derive(Debug, Default)]
struct GroupState {
    roster: Roster,
    topic: String,
    modes: String,
}

#[derive(Debug)]
struct WindowState {
    title: String,
    buffer: Buffer,
    group: Option<GroupState>,
}

/// Lines ending at a window's current line, captured for rendering.
#[derive(Debug, Clone, Default)]
pub struct BufferView {
    pub lines: Vec<Message>,
    pub total: usize,
    /// Index of the first captured line within the full buffer.
    pub first: usize,
    pub pinned: bool,
}

#[derive(Debug)]
pub struct Window {
    id: WindowId,
    kind: WindowKind,
    scrollback: usize,
    dirty: DirtyFlag,
    state: RwLock<WindowState>,
}

impl Window {
    pub fn new(kind: WindowKind, title: impl Into<String>, dirty: DirtyFlag) -> Self {
        Self {
            id: WindowId::next(),
            kind,
            scrollback: 0,
            dirty,
            state: RwLock::new(WindowState {
                title: title.into(),
                buffer: Buffer::default(),
                group: (kind == WindowKind::Group).then(GroupState::default),
            }),
        }
    }

    /// Keep at most `limit` lines; `0` keeps everything.
    pub fn with_scrollback(mut self, limit: usize) -> Self {
        self.scrollback = limit;
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, WindowState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, WindowState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn is_status(&self) -> bool {
        self.kind == WindowKind::Status
    }

    pub fn has_roster(&self) -> bool {
        self.kind == WindowKind::Group
    }

    pub fn title(&self) -> String {
        self.read().title.clone()
    }

    pub fn title_is(&self, title: &str) -> bool {
        self.read().title == title
    }

    /// Callers must uphold title uniqueness; see `WindowManager::rename`.
    pub(super) fn set_title(&self, title: &str) {
        self.write().title = title.to_string();
        self.dirty.mark();
    }

    // -- buffer --

    pub fn push(&self, message: Message) {
        self.write().buffer.push(message, self.scrollback);
        self.dirty.mark();
    }

    pub fn system(&self, text: impl Into<String>) {
        self.push(Message::event(MessageKind::System, text));
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(Message::event(MessageKind::Error, text));
    }

    pub fn len(&self) -> usize {
        self.read().buffer.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn messages(&self) -> Vec<Message> {
        self.read().buffer.messages.clone()
    }

    /// Capture at most `rows` lines ending at the current line.
    pub fn view(&self, rows: usize) -> BufferView {
        let state = self.read();
        let buffer = &state.buffer;
        let total = buffer.messages.len();
        let end = buffer.current_line().map_or(0, |line| line + 1).min(total);
        let first = end.saturating_sub(rows);
        BufferView {
            lines: buffer.messages[first..end].to_vec(),
            total,
            first,
            pinned: buffer.scroll == ScrollCursor::Pinned,
        }
    }

    pub fn scroll_cursor(&self) -> ScrollCursor {
        self.read().buffer.scroll
    }

    /// Index of the line the view ends at, `None` for an empty buffer.
    pub fn current_line(&self) -> Option<usize> {
        self.read().buffer.current_line()
    }

    /// Move the view so it ends at `pos`. Negative or past-the-end positions
    /// pin the view to the newest line.
    pub fn scroll_to(&self, pos: i64) {
        self.write().buffer.scroll_to(pos);
        self.dirty.mark();
    }

    /// Move the view by `delta` lines, stopping at the first line.
    pub fn scroll_by(&self, delta: i64) {
        {
            let mut state = self.write();
            let buffer = &mut state.buffer;
            let Some(current) = buffer.current_line() else {
                buffer.scroll = ScrollCursor::Pinned;
                return;
            };
            let target = i64::try_from(current).unwrap_or(i64::MAX).saturating_add(delta);
            buffer.scroll_to(target.max(0));
        }
        self.dirty.mark();
    }

    // -- activity --

    /// Mark the window as seen.
    pub fn touch(&self) {
        let mut state = self.write();
        state.buffer.unseen = false;
        state.buffer.notice = false;
    }

    /// Flag the window as needing attention.
    pub fn notice(&self) {
        self.write().buffer.notice = true;
        self.dirty.mark();
    }

    pub fn activity(&self) -> Activity {
        let state = self.read();
        if state.buffer.notice {
            Activity::Notice
        } else if state.buffer.unseen {
            Activity::Unseen
        } else {
            Activity::None
        }
    }

    pub fn has_activity(&self) -> bool {
        self.activity() != Activity::None
    }

    pub fn has_notice(&self) -> bool {
        self.activity() == Activity::Notice
    }

    // -- group state; no-ops on windows without a roster --

    fn with_group<R>(&self, f: impl FnOnce(&mut GroupState) -> R) -> Option<R> {
        let result = self.write().group.as_mut().map(f);
        if result.is_some() {
            self.dirty.mark();
        }
        result
    }

    fn read_group<R>(&self, f: impl FnOnce(&GroupState) -> R) -> Option<R> {
        self.read().group.as_ref().map(f)
    }

    pub fn add_user(&self, name: &str, privilege: Privilege) {
        self.with_group(|g| g.roster.add(name, privilege));
    }

    pub fn update_user(&self, old: &str, new: &str) -> bool {
        self.with_group(|g| g.roster.rename(old, new)).unwrap_or(false)
    }

    pub fn delete_user(&self, name: &str) -> bool {
        self.with_group(|g| g.roster.remove(name)).unwrap_or(false)
    }

    /// Replace the roster from raw NAMES tokens.
    pub fn set_users<I, S>(&self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.with_group(|g| g.roster.replace(tokens));
    }

    pub fn set_privilege(&self, name: &str, privilege: Privilege) -> bool {
        self.with_group(|g| g.roster.set_privilege(name, privilege)).unwrap_or(false)
    }

    pub fn has_user(&self, name: &str) -> bool {
        self.read_group(|g| g.roster.contains(name)).unwrap_or(false)
    }

    pub fn privilege_of(&self, name: &str) -> Option<Privilege> {
        self.read_group(|g| g.roster.get(name).map(|e| e.privilege)).flatten()
    }

    /// Roster in storage order.
    pub fn users(&self) -> Vec<RosterEntry> {
        self.read_group(|g| g.roster.entries().to_vec()).unwrap_or_default()
    }

    /// Roster in display order.
    pub fn presentation(&self) -> Vec<RosterEntry> {
        self.read_group(|g| g.roster.presentation()).unwrap_or_default()
    }

    pub fn topic(&self) -> String {
        self.read_group(|g| g.topic.clone()).unwrap_or_default()
    }

    pub fn set_topic(&self, topic: &str) {
        self.with_group(|g| g.topic = topic.to_string());
    }

    pub fn modes(&self) -> String {
        self.read_group(|g| g.modes.clone()).unwrap_or_default()
    }

    pub fn set_modes(&self, modes: &str) {
        self.with_group(|g| g.modes = modes.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(title: &str) -> Window {
        Window::new(WindowKind::Group, title, DirtyFlag::new())
    }

    #[test]
    fn test_write_sets_unseen_and_touch_clears() {
        let win = group("#rust");
        assert_eq!(win.activity(), Activity::None);
        win.system("hello");
        assert_eq!(win.activity(), Activity::Unseen);
        win.notice();
        assert_eq!(win.activity(), Activity::Notice);
        assert!(win.has_activity());
        win.touch();
        assert_eq!(win.activity(), Activity::None);
    }

    #[test]
    fn test_write_raises_dirty() {
        let dirty = DirtyFlag::new();
        let win = Window::new(WindowKind::Direct, "peer", dirty.clone());
        win.push(Message::new("peer", "hi", MessageKind::Normal));
        assert!(dirty.is_pending());
    }

    #[test]
    fn test_scroll_to_and_pinning() {
        let win = group("#rust");
        assert_eq!(win.current_line(), None);
        for i in 0..5 {
            win.system(format!("line {i}"));
        }
        assert_eq!(win.current_line(), Some(4));

        win.scroll_to(1);
        assert_eq!(win.scroll_cursor(), ScrollCursor::At(1));
        win.system("more");
        assert_eq!(win.current_line(), Some(1));

        win.scroll_to(-1);
        assert_eq!(win.scroll_cursor(), ScrollCursor::Pinned);
        assert_eq!(win.current_line(), Some(5));

        win.scroll_to(99);
        assert_eq!(win.scroll_cursor(), ScrollCursor::Pinned);
    }

    #[test]
    fn test_scroll_by_stops_at_top() {
        let win = group("#rust");
        for i in 0..3 {
            win.system(format!("line {i}"));
        }
        win.scroll_by(-10);
        assert_eq!(win.scroll_cursor(), ScrollCursor::At(0));
        win.scroll_by(1);
        assert_eq!(win.current_line(), Some(1));
        win.scroll_by(5);
        assert_eq!(win.scroll_cursor(), ScrollCursor::Pinned);
    }

    #[test]
    fn test_scrollback_limit_trims_front() {
        let win = group("#rust").with_scrollback(3);
        for i in 0..5 {
            win.system(format!("line {i}"));
        }
        let texts: Vec<String> = win.messages().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_view_ends_at_current_line() {
        let win = group("#rust");
        for i in 0..10 {
            win.system(format!("line {i}"));
        }
        let view = win.view(3);
        assert!(view.pinned);
        assert_eq!(view.first, 7);
        assert_eq!(view.lines.len(), 3);
        assert_eq!(view.lines[2].text, "line 9");

        win.scroll_to(4);
        let view = win.view(3);
        assert!(!view.pinned);
        assert_eq!(view.lines[0].text, "line 2");
        assert_eq!(view.lines[2].text, "line 4");
    }

    #[test]
    fn test_roster_ops_only_on_groups() {
        let win = Window::new(WindowKind::Direct, "peer", DirtyFlag::new());
        win.add_user("alice", Privilege::None);
        assert!(!win.has_user("alice"));
        assert!(win.users().is_empty());
        assert!(!win.delete_user("alice"));

        let win = group("#rust");
        win.add_user("alice", Privilege::Voice);
        assert!(win.has_user("Alice"));
        assert_eq!(win.privilege_of("alice"), Some(Privilege::Voice));
        assert!(win.update_user("alice", "alicia"));
        assert!(win.has_user("alicia"));
        assert!(win.delete_user("alicia"));
        assert!(win.users().is_empty());
    }

    #[test]
    fn test_topic_and_modes() {
        let win = group("#rust");
        win.set_topic("welcome");
        win.set_modes("+nt");
        assert_eq!(win.topic(), "welcome");
        assert_eq!(win.modes(), "+nt");

        let status = Window::new(WindowKind::Status, STATUS_TITLE, DirtyFlag::new());
        status.set_topic("ignored");
        assert_eq!(status.topic(), "");
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(group("#a").id(), group("#a").id());
    }
}
