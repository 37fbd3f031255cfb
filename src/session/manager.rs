//! Ordered collection of open windows and the active selection.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use tracing::warn;

use super::signal::DirtyFlag;
use super::window::{Activity, Window, WindowHandle, WindowId, WindowKind, STATUS_TITLE};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("cannot close the status window")]
    StatusWindow,
    #[error("no window #{0}")]
    OutOfRange(usize),
    #[error("a window named {0} is already open")]
    DuplicateTitle(String),
    #[error("window is not open")]
    NotOpen,
}

/// One entry of the tab bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLabel {
    pub index: usize,
    pub title: String,
    pub activity: Activity,
    pub active: bool,
}

#[derive(Debug)]
struct Windows {
    list: Vec<WindowHandle>,
    active: usize,
}

impl Windows {
    fn position(&self, id: WindowId) -> Option<usize> {
        self.list.iter().position(|w| w.id() == id)
    }

    fn named(&self, title: &str) -> Option<&WindowHandle> {
        self.list.iter().find(|w| w.title_is(title))
    }

    fn select_at(&mut self, index: usize) -> Result<WindowHandle, WindowError> {
        let window = self
            .list
            .get(index)
            .cloned()
            .ok_or(WindowError::OutOfRange(index))?;
        self.active = index;
        Ok(window)
    }

    /// Remove the window at `index`, returning it and the window that is
    /// active afterwards.
    fn close_at(&mut self, index: usize) -> Result<(WindowHandle, WindowHandle), WindowError> {
        if index == 0 {
            return Err(WindowError::StatusWindow);
        }
        if index >= self.list.len() {
            return Err(WindowError::OutOfRange(index));
        }
        let removed = self.list.remove(index);
        if self.active >= index {
            self.active = self.active.saturating_sub(1);
        }
        self.active = self.active.min(self.list.len() - 1);
        Ok((removed, self.list[self.active].clone()))
    }
}

/// The window list. Index 0 always holds the status window.
///
/// Structural changes happen under one write guard; readers receive owned
/// snapshots so no lock is held while a caller works with the windows.
#[derive(Debug)]
pub struct WindowManager {
    inner: RwLock<Windows>,
    dirty: DirtyFlag,
    scrollback: usize,
}

impl WindowManager {
    pub fn new(dirty: DirtyFlag) -> Self {
        Self::with_scrollback(dirty, 0)
    }

    pub fn with_scrollback(dirty: DirtyFlag, scrollback: usize) -> Self {
        let status = Window::new(WindowKind::Status, STATUS_TITLE, dirty.clone())
            .with_scrollback(scrollback);
        Self {
            inner: RwLock::new(Windows {
                list: vec![WindowHandle::new(status)],
                active: 0,
            }),
            dirty,
            scrollback,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Windows> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Windows> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a window at the end. The active selection is unchanged.
    pub fn append(&self, window: Window) -> Result<WindowHandle, WindowError> {
        let handle = WindowHandle::new(window);
        {
            let mut windows = self.write();
            let title = handle.title();
            if windows.named(&title).is_some() {
                return Err(WindowError::DuplicateTitle(title));
            }
            windows.list.push(handle.clone());
        }
        self.dirty.mark();
        Ok(handle)
    }

    /// Return the window titled `title`, creating it with `kind` if needed.
    /// The boolean is `true` when the window was created by this call.
    pub fn open(&self, kind: WindowKind, title: &str) -> (WindowHandle, bool) {
        if let Some(existing) = self.named(title) {
            return (existing, false);
        }
        let created = {
            let mut windows = self.write();
            // re-check: another task may have opened it between the two locks
            if let Some(existing) = windows.named(title) {
                return (existing.clone(), false);
            }
            let window = Window::new(kind, title, self.dirty.clone()).with_scrollback(self.scrollback);
            let handle = WindowHandle::new(window);
            windows.list.push(handle.clone());
            handle
        };
        self.dirty.mark();
        (created, true)
    }

    pub fn named(&self, title: &str) -> Option<WindowHandle> {
        self.read().named(title).cloned()
    }

    pub fn index(&self, index: usize) -> Option<WindowHandle> {
        self.read().list.get(index).cloned()
    }

    pub fn position(&self, id: WindowId) -> Option<usize> {
        self.read().position(id)
    }

    pub fn windows(&self) -> Vec<WindowHandle> {
        self.read().list.clone()
    }

    pub fn len(&self) -> usize {
        self.read().list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().list.is_empty()
    }

    pub fn status(&self) -> WindowHandle {
        self.read().list[0].clone()
    }

    pub fn active(&self) -> WindowHandle {
        let windows = self.read();
        windows.list[windows.active].clone()
    }

    pub fn active_index(&self) -> usize {
        self.read().active
    }

    pub fn select_index(&self, index: usize) -> Result<(), WindowError> {
        let selected = self.write().select_at(index);
        self.after_select(selected)
    }

    pub fn select(&self, window: &WindowHandle) -> Result<(), WindowError> {
        let selected = {
            let mut windows = self.write();
            let index = windows.position(window.id()).ok_or(WindowError::NotOpen)?;
            windows.select_at(index)
        };
        self.after_select(selected)
    }

    pub fn select_next(&self) {
        let selected = {
            let mut windows = self.write();
            let next = (windows.active + 1) % windows.list.len();
            windows.select_at(next)
        };
        let _ = self.after_select(selected);
    }

    pub fn select_prev(&self) {
        let selected = {
            let mut windows = self.write();
            let len = windows.list.len();
            let prev = (windows.active + len - 1) % len;
            windows.select_at(prev)
        };
        let _ = self.after_select(selected);
    }

    fn after_select(&self, selected: Result<WindowHandle, WindowError>) -> Result<(), WindowError> {
        match selected {
            Ok(window) => {
                window.touch();
                self.dirty.mark();
                Ok(())
            }
            Err(e) => {
                warn!("failed to select window; {e}");
                Err(e)
            }
        }
    }

    /// Remove the window at `index`. The status window cannot be closed.
    pub fn close_index(&self, index: usize) -> Result<WindowHandle, WindowError> {
        let closed = self.write().close_at(index);
        self.after_close(closed)
    }

    /// Remove `window`. Lookup and removal happen under one guard.
    pub fn close(&self, window: &WindowHandle) -> Result<WindowHandle, WindowError> {
        let closed = {
            let mut windows = self.write();
            let index = windows.position(window.id()).ok_or(WindowError::NotOpen)?;
            windows.close_at(index)
        };
        self.after_close(closed)
    }

    fn after_close(
        &self,
        closed: Result<(WindowHandle, WindowHandle), WindowError>,
    ) -> Result<WindowHandle, WindowError> {
        match closed {
            Ok((removed, now_active)) => {
                now_active.touch();
                self.dirty.mark();
                Ok(removed)
            }
            Err(e) => {
                warn!("failed to close window; {e}");
                Err(e)
            }
        }
    }

    /// Retitle `window`, refusing titles already used by another window.
    pub fn rename(&self, window: &WindowHandle, title: &str) -> Result<(), WindowError> {
        let windows = self.write();
        if windows.position(window.id()).is_none() {
            return Err(WindowError::NotOpen);
        }
        if let Some(other) = windows.named(title) {
            if other.id() != window.id() {
                return Err(WindowError::DuplicateTitle(title.to_string()));
            }
        }
        window.set_title(title);
        Ok(())
    }

    /// Scroll the active window by `delta` lines.
    pub fn scroll_offset(&self, delta: i64) {
        self.active().scroll_by(delta);
    }

    /// Scroll the active window to line `pos`; negative pins to the end.
    pub fn scroll_to(&self, pos: i64) {
        self.active().scroll_to(pos);
    }

    pub fn tabs(&self) -> Vec<TabLabel> {
        let windows = self.read();
        windows
            .list
            .iter()
            .enumerate()
            .map(|(index, window)| {
                let active = index == windows.active;
                TabLabel {
                    index,
                    title: window.title(),
                    activity: if active { Activity::None } else { window.activity() },
                    active,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with(titles: &[&str]) -> WindowManager {
        let wm = WindowManager::new(DirtyFlag::new());
        for title in titles {
            wm.open(WindowKind::Group, title);
        }
        wm
    }

    fn titles(wm: &WindowManager) -> Vec<String> {
        wm.windows().iter().map(|w| w.title()).collect()
    }

    #[test]
    fn test_starts_with_status() {
        let wm = WindowManager::new(DirtyFlag::new());
        assert_eq!(wm.len(), 1);
        assert_eq!(wm.active_index(), 0);
        assert!(wm.status().is_status());
        assert_eq!(wm.active().title(), STATUS_TITLE);
    }

    #[test]
    fn test_open_reuses_existing() {
        let wm = manager_with(&["#a"]);
        let (first, created) = wm.open(WindowKind::Group, "#b");
        assert!(created);
        let (again, created) = wm.open(WindowKind::Group, "#b");
        assert!(!created);
        assert_eq!(first.id(), again.id());
        assert_eq!(titles(&wm), vec!["status", "#a", "#b"]);
        assert_eq!(wm.active_index(), 0);
    }

    #[test]
    fn test_append_rejects_duplicate_title() {
        let wm = manager_with(&["#a"]);
        let dup = Window::new(WindowKind::Group, "#a", DirtyFlag::new());
        assert_eq!(
            wm.append(dup).unwrap_err(),
            WindowError::DuplicateTitle("#a".into())
        );
        let fresh = Window::new(WindowKind::Direct, "peer", DirtyFlag::new());
        assert!(wm.append(fresh).is_ok());
        assert_eq!(wm.len(), 3);
    }

    #[test]
    fn test_close_status_rejected() {
        let wm = manager_with(&["#a", "#b"]);
        assert_eq!(wm.close_index(0).unwrap_err(), WindowError::StatusWindow);
        assert_eq!(wm.len(), 3);
    }

    #[test]
    fn test_close_adjusts_active() {
        let wm = manager_with(&["#a", "#b"]);
        wm.select_index(1).unwrap();
        wm.close_index(1).unwrap();
        assert_eq!(wm.len(), 2);
        assert_eq!(wm.active_index(), 0);

        let wm = manager_with(&["#a", "#b"]);
        wm.select_index(2).unwrap();
        wm.close_index(1).unwrap();
        assert_eq!(wm.active_index(), 1);
        assert_eq!(wm.active().title(), "#b");

        let wm = manager_with(&["#a", "#b"]);
        wm.select_index(1).unwrap();
        wm.close_index(2).unwrap();
        assert_eq!(wm.active_index(), 1);
    }

    #[test]
    fn test_concurrent_close_removes_the_given_window() {
        let names: Vec<String> = (0..200).map(|i| format!("#{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let wm = manager_with(&refs);
        let opened = wm.windows().split_off(1);
        let evens: Vec<WindowHandle> = opened.iter().step_by(2).cloned().collect();
        let odds: Vec<WindowHandle> = opened.iter().skip(1).step_by(2).cloned().collect();

        std::thread::scope(|scope| {
            for batch in [&evens, &odds] {
                let wm = &wm;
                scope.spawn(move || {
                    for win in batch {
                        let closed = wm.close(win).unwrap();
                        assert_eq!(closed.id(), win.id());
                    }
                });
            }
        });
        assert_eq!(titles(&wm), vec!["status"]);
    }

    #[test]
    fn test_close_out_of_range() {
        let wm = manager_with(&["#a"]);
        assert_eq!(wm.close_index(5).unwrap_err(), WindowError::OutOfRange(5));
        assert_eq!(wm.len(), 2);
    }

    #[test]
    fn test_select_out_of_range_keeps_active() {
        let wm = manager_with(&["#a", "#b"]);
        wm.select_index(2).unwrap();
        assert_eq!(wm.select_index(3).unwrap_err(), WindowError::OutOfRange(3));
        assert_eq!(wm.active_index(), 2);
    }

    #[test]
    fn test_select_next_prev_wrap() {
        let wm = manager_with(&["#a", "#b"]);
        wm.select_prev();
        assert_eq!(wm.active_index(), 2);
        wm.select_next();
        assert_eq!(wm.active_index(), 0);
        wm.select_next();
        assert_eq!(wm.active_index(), 1);
    }

    #[test]
    fn test_select_touches_window() {
        let wm = manager_with(&["#a"]);
        let win = wm.index(1).unwrap();
        win.system("hi");
        win.notice();
        assert_eq!(wm.tabs()[1].activity, Activity::Notice);
        wm.select(&win).unwrap();
        assert_eq!(win.activity(), Activity::None);
        assert!(wm.tabs()[1].active);
    }

    #[test]
    fn test_rename_preserves_uniqueness() {
        let wm = WindowManager::new(DirtyFlag::new());
        let (peer, _) = wm.open(WindowKind::Direct, "peer");
        wm.open(WindowKind::Direct, "other");
        assert!(wm.rename(&peer, "other").is_err());
        wm.rename(&peer, "renamed").unwrap();
        assert!(wm.named("renamed").is_some());
        assert!(wm.named("peer").is_none());
    }

    #[test]
    fn test_close_by_handle() {
        let wm = manager_with(&["#a", "#b"]);
        let win = wm.named("#a").unwrap();
        wm.close(&win).unwrap();
        assert_eq!(titles(&wm), vec!["status", "#b"]);
        assert_eq!(wm.close(&win).unwrap_err(), WindowError::NotOpen);
    }

    #[test]
    fn test_scroll_applies_to_active() {
        let wm = manager_with(&["#a"]);
        wm.select_index(1).unwrap();
        let win = wm.active();
        for i in 0..5 {
            win.system(format!("{i}"));
        }
        wm.scroll_offset(-2);
        assert_eq!(win.current_line(), Some(2));
        wm.scroll_to(-1);
        assert_eq!(win.current_line(), Some(4));
    }
}
