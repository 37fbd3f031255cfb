//! Terminal rendering. Each frame draws a [`View`] captured from the session,
//! so no session lock is held while ratatui lays out widgets.

mod input_box;
mod layout;
mod message_area;
mod status_bar;
mod theme;
mod topic_bar;
mod user_list;

pub use layout::message_rows;

use ratatui::prelude::*;

use crate::app::App;
use crate::session::history::InputMode;
use crate::session::manager::TabLabel;
use crate::session::roster::RosterEntry;
use crate::session::window::{BufferView, WindowKind};

/// Snapshot of everything one frame shows.
#[derive(Debug, Clone)]
pub struct View {
    pub tabs: Vec<TabLabel>,
    pub title: String,
    pub kind: WindowKind,
    pub buffer: BufferView,
    pub topic: String,
    pub modes: String,
    /// Presentation order; `None` for windows without a roster.
    pub users: Option<Vec<RosterEntry>>,
    pub nickname: String,
    pub input: String,
    pub cursor: usize,
    pub mode: InputMode,
    pub timestamp_format: String,
}

impl View {
    pub fn capture(app: &App, rows: usize) -> Self {
        let session = &app.session;
        let windows = session.windows();
        let active = windows.active();
        let users = active.has_roster().then(|| active.presentation());
        Self {
            tabs: windows.tabs(),
            title: active.title(),
            kind: active.kind(),
            buffer: active.view(rows),
            topic: active.topic(),
            modes: active.modes(),
            users,
            nickname: session.nickname(),
            input: app.input.text.clone(),
            cursor: app.input.cursor,
            mode: app.input.mode,
            timestamp_format: app.config.ui.timestamp_format.clone(),
        }
    }
}

pub fn render(frame: &mut Frame, view: &View) {
    let app_layout = layout::compute_layout(frame.area(), view.users.is_some());

    status_bar::render_tabs(frame, app_layout.tab_bar, view);
    topic_bar::render(frame, app_layout.topic_bar, view);
    message_area::render(frame, app_layout.message_area, view);
    if let Some(users) = &view.users {
        user_list::render(frame, app_layout.user_list, users);
    }
    input_box::render(frame, app_layout.input_box, view);
    status_bar::render(frame, app_layout.status_bar, view);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::AppConfig;
    use crate::session::roster::Privilege;
    use crate::session::testing::session;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;

    fn screen(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let view = View::capture(app, message_rows(frame.area()));
                render(frame, &view);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_capture_group_window() {
        let (s, _rx) = session("me");
        let app = App::new(Arc::new(s), AppConfig::default());
        let (win, _) = app.session.windows().open(WindowKind::Group, "#rust");
        win.add_user("me", Privilege::None);
        win.add_user("ferris", Privilege::Operator);
        win.set_topic("Rust talk");
        win.system("hello");
        app.session.windows().select(&win).unwrap();

        let view = View::capture(&app, 10);
        assert_eq!(view.title, "#rust");
        assert_eq!(view.topic, "Rust talk");
        assert_eq!(view.tabs.len(), 2);
        let users = view.users.unwrap();
        assert_eq!(users[0].name, "ferris");
        assert_eq!(view.buffer.lines.last().unwrap().text, "hello");
    }

    #[test]
    fn test_status_window_has_no_user_list() {
        let (s, _rx) = session("me");
        let app = App::new(Arc::new(s), AppConfig::default());
        let view = View::capture(&app, 10);
        assert!(view.users.is_none());
        assert_eq!(view.kind, WindowKind::Status);
    }

    #[test]
    fn test_renders_tabs_topic_and_lines() {
        let (s, _rx) = session("me");
        let app = App::new(Arc::new(s), AppConfig::default());
        let (win, _) = app.session.windows().open(WindowKind::Group, "#rust");
        win.add_user("ferris", Privilege::Operator);
        win.set_topic("Rust talk");
        win.system("welcome aboard");
        app.session.windows().select(&win).unwrap();

        let text = screen(&app, 80, 20);
        assert!(text.contains("0:status"));
        assert!(text.contains("1:#rust"));
        assert!(text.contains("Rust talk"));
        assert!(text.contains("welcome aboard"));
        assert!(text.contains("@ferris"));
        assert!(text.contains("[me]"));
    }
}
