use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::Level;

use crate::app::dispatch;
use crate::app::event::AppEvent;
use crate::app::App;
use crate::session::history::InputMode;
use crate::session::window::{Message, MessageKind};

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Terminal(cevent) => {
            app.session.dirty().mark();
            handle_terminal(app, cevent);
        }
        AppEvent::StatusLog { level, text } => {
            let kind = if level == Level::ERROR {
                MessageKind::Error
            } else {
                MessageKind::System
            };
            app.session.windows().status().push(Message::event(kind, text));
        }
    }
}

fn handle_terminal(app: &mut App, event: CEvent) {
    match event {
        CEvent::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        CEvent::Paste(text) => {
            app.completer.clear();
            for c in text.chars().filter(|c| !c.is_control()) {
                app.input.insert_char(c);
            }
        }
        _ => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    if ctrl && key.code == KeyCode::Char('c') {
        dispatch::handle_command(app, "exit");
        return;
    }

    if key.code == KeyCode::Tab {
        complete(app);
        return;
    }
    app.completer.clear();

    let session = app.session.clone();
    let windows = session.windows();
    let page = i64::from(app.config.ui.scroll_page);
    match key.code {
        KeyCode::Enter => submit(app),
        KeyCode::Up => history_previous(app),
        KeyCode::Down => history_next(app),
        KeyCode::PageUp => windows.scroll_offset(-page),
        KeyCode::PageDown => windows.scroll_offset(page),
        KeyCode::Home if ctrl => windows.scroll_to(0),
        KeyCode::End if ctrl => windows.scroll_to(-1),
        KeyCode::Left if alt => windows.select_prev(),
        KeyCode::Right if alt => windows.select_next(),
        KeyCode::Char(c) if alt && c.is_ascii_digit() => {
            let index = c.to_digit(10).map_or(0, |d| d as usize);
            let _ = windows.select_index(index);
        }
        KeyCode::Char('p') if ctrl => windows.select_prev(),
        KeyCode::Char('n') if ctrl => windows.select_next(),
        KeyCode::Char('a') if ctrl => app.input.move_home(),
        KeyCode::Char('e') if ctrl => app.input.move_end(),
        KeyCode::Char('w') if ctrl => app.input.delete_word_back(),
        KeyCode::Char('u') if ctrl => app.input.clear_line(),
        KeyCode::Char(_) if ctrl || alt => {}
        KeyCode::Char('/') if app.input.is_empty() && app.input.mode == InputMode::Message => {
            app.input.toggle_mode();
        }
        KeyCode::Char(c) => app.input.insert_char(c),
        KeyCode::Backspace => {
            if app.input.is_empty() && app.input.mode == InputMode::Command {
                app.input.toggle_mode();
            } else if alt {
                app.input.delete_word_back();
            } else {
                app.input.delete_back();
            }
        }
        KeyCode::Delete => app.input.delete_forward(),
        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),
        KeyCode::Home => app.input.move_home(),
        KeyCode::End => app.input.move_end(),
        _ => {}
    }
}

fn submit(app: &mut App) {
    let entry = app.input.take();
    if entry.is_empty() {
        return;
    }
    let active = app.session.windows().active();
    app.session.history().append(active.id(), entry.clone());
    match entry.mode {
        InputMode::Command => dispatch::handle_command(app, &entry.text),
        InputMode::Message => match entry.text.strip_prefix('/') {
            // "//text" sends "/text" as a message
            Some(rest) if rest.starts_with('/') => dispatch::send_message(&app.session, rest),
            Some(rest) => dispatch::handle_command(app, rest),
            None => dispatch::send_message(&app.session, &entry.text),
        },
    }
}

fn history_previous(app: &mut App) {
    let win = app.session.windows().active().id();
    let history = app.session.history();
    history.insert(win, app.input.peek());
    let entry = history.previous(win);
    app.input.load(entry);
}

fn history_next(app: &mut App) {
    let win = app.session.windows().active().id();
    let history = app.session.history();
    history.insert(win, app.input.peek());
    let entry = history.next(win);
    app.input.load(entry);
}

fn complete(app: &mut App) {
    if app.input.mode == InputMode::Command {
        return;
    }
    let line = if app.completer.is_active() {
        app.completer.tab()
    } else {
        let active = app.session.windows().active();
        if !active.has_roster() {
            return;
        }
        Some(app.completer.reset(&app.input.text, &active))
    };
    if let Some(line) = line {
        app.input.set_text(line);
    }
}
