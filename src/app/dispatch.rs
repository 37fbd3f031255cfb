//! Executes submitted input lines against the session.
//!
//! Commands that address a group or a peer fall back to the active window's
//! title when no explicit target is given. Outgoing text is echoed locally
//! right away; a transport failure later does not retract the echo.

use tracing::warn;

use crate::app::action::Action;
use crate::app::App;
use crate::irc::commands::{self, ParsedCommand, COMMANDS};
use crate::irc::event::is_channel;
use crate::session::window::{Message, MessageKind, WindowHandle, WindowKind};
use crate::session::Session;

/// Pick the target for `command`: the explicit one if given, else the active
/// window's title. `None` when the active window is the status window.
pub fn resolve_target(session: &Session, command: &str, explicit: Option<String>) -> Option<String> {
    if explicit.is_some() {
        return explicit;
    }
    let active = session.windows().active();
    if active.is_status() {
        warn!(command, "{command}: no target given and the status window has none");
        return None;
    }
    Some(active.title())
}

/// Like [`resolve_target`], but the result must name a group.
fn resolve_channel(session: &Session, command: &str, explicit: Option<String>) -> Option<String> {
    let target = resolve_target(session, command, explicit)?;
    if !is_channel(&target) {
        warn!(command, target = %target, "{command}: unable to determine current channel");
        return None;
    }
    Some(target)
}

/// Where to echo something we sent to `target`.
fn echo_window(session: &Session, target: &str) -> WindowHandle {
    let windows = session.windows();
    if let Some(window) = windows.named(target) {
        return window;
    }
    if is_channel(target) {
        windows.status()
    } else {
        windows.open(WindowKind::Direct, target).0
    }
}

/// Send `text` to the active window's conversation.
pub fn send_message(session: &Session, text: &str) {
    let active = session.windows().active();
    if active.is_status() {
        active.error("Cannot send messages to the status window. Join a channel or use msg.");
        return;
    }
    let target = active.title();
    session.send(Action::SendPrivmsg {
        target,
        text: text.to_string(),
    });
    active.push(Message::new(session.nickname(), text, MessageKind::Normal));
}

fn write_help(window: &WindowHandle, command: Option<&str>) {
    match command {
        Some(name) => match commands::describe(name) {
            Some(desc) => window.system(format!("{name}: {desc}")),
            None => window.error(format!("Unknown command: {name}")),
        },
        None => {
            window.system("Commands:");
            for (name, desc) in COMMANDS {
                window.system(format!("  {name:<10} {desc}"));
            }
        }
    }
}

/// Parse and run one command line.
pub fn handle_command(app: &mut App, text: &str) {
    let session = app.session.clone();
    let session = session.as_ref();
    let Some(cmd) = commands::parse_command(text) else {
        let name = text.split_whitespace().next().unwrap_or(text);
        session
            .windows()
            .active()
            .error(format!("Unknown command or missing arguments: {name}"));
        return;
    };

    match cmd {
        ParsedCommand::Help { command } => {
            write_help(&session.windows().active(), command.as_deref());
        }
        ParsedCommand::Exit { message } => {
            let message = message.or_else(|| Some(app.config.behavior.quit_message.clone()));
            session.send(Action::Quit { message });
            app.should_quit = true;
        }
        ParsedCommand::Connect => session.send(Action::Connect),
        ParsedCommand::Disconnect { message } => {
            let message = message.or_else(|| Some(app.config.behavior.quit_message.clone()));
            session.send(Action::Disconnect { message });
        }
        ParsedCommand::SelectWindow { index } => {
            let _ = session.windows().select_index(index);
        }
        ParsedCommand::CloseWindow { index } => {
            let index = index.unwrap_or_else(|| session.windows().active_index());
            let Some(window) = session.windows().index(index) else {
                warn!(index, "failed to close window; no window #{index}");
                return;
            };
            if window.has_roster() && window.has_user(&session.nickname()) {
                session.send(Action::Part {
                    channel: window.title(),
                    reason: Some(app.config.behavior.part_message.clone()),
                });
            }
            session.close_window(&window);
        }
        ParsedCommand::Join { channel } => {
            if let Some(channel) = resolve_channel(session, "join", channel) {
                session.send(Action::Join { channel });
            }
        }
        ParsedCommand::Part { channel, reason } => {
            if let Some(channel) = resolve_channel(session, "part", channel) {
                let reason = reason.or_else(|| Some(app.config.behavior.part_message.clone()));
                session.send(Action::Part { channel, reason });
            }
        }
        ParsedCommand::Invite { channel, nick } => {
            if let Some(channel) = resolve_channel(session, "invite", channel) {
                session.send(Action::SendInvite { nick, channel });
            }
        }
        ParsedCommand::Topic { channel, text } => {
            if let Some(channel) = resolve_channel(session, "topic", channel) {
                session.send(Action::SetTopic { channel, text });
            }
        }
        ParsedCommand::Whois { nick } => session.send(Action::SendWhois { nick }),
        ParsedCommand::Names { channel } => {
            if let Some(channel) = resolve_channel(session, "names", channel) {
                session.send(Action::Names { channel });
            }
        }
        ParsedCommand::Nick { nick } => session.send(Action::ChangeNick { nick }),
        ParsedCommand::Me { text } => {
            let Some(target) = resolve_target(session, "me", None) else {
                return;
            };
            session.send(Action::SendAction {
                target: target.clone(),
                text: text.clone(),
            });
            echo_window(session, &target).push(Message::new(
                session.nickname(),
                text,
                MessageKind::Action,
            ));
        }
        ParsedCommand::Msg { target, text } => {
            if target.eq_ignore_ascii_case(crate::session::window::STATUS_TITLE) {
                warn!("msg: cannot message the status window");
                return;
            }
            session.send(Action::SendPrivmsg {
                target: target.clone(),
                text: text.clone(),
            });
            let window = echo_window(session, &target);
            if window.is_status() {
                window.push(Message::new(
                    session.nickname(),
                    format!("-> {target}: {text}"),
                    MessageKind::Normal,
                ));
            } else {
                window.push(Message::new(session.nickname(), text, MessageKind::Normal));
            }
        }
        ParsedCommand::Ctcp { target, command } => {
            session.send(Action::SendCtcp {
                target: target.clone(),
                command: command.clone(),
            });
            session.windows().status().push(Message::new(
                session.nickname(),
                format!("CTCP {command} <- {target}"),
                MessageKind::Notice,
            ));
        }
        ParsedCommand::Notice { target, text } => {
            session.send(Action::SendNotice {
                target: target.clone(),
                text: text.clone(),
            });
            let window = session
                .windows()
                .named(&target)
                .unwrap_or_else(|| session.windows().status());
            window.push(Message::new(
                session.nickname(),
                format!("-> {target}: {text}"),
                MessageKind::Notice,
            ));
        }
        ParsedCommand::Kick {
            channel,
            nick,
            reason,
        } => {
            if let Some(channel) = resolve_channel(session, "kick", channel) {
                session.send(Action::SendKick {
                    channel,
                    user: nick,
                    reason,
                });
            }
        }
        ParsedCommand::Mode { target, modes } => {
            if let Some(target) = resolve_target(session, "mode", target) {
                session.send(Action::SendMode { target, modes });
            }
        }
        ParsedCommand::MemberMode {
            channel,
            mode,
            nick,
        } => {
            if let Some(channel) = resolve_channel(session, mode, channel) {
                session.send(Action::SendMode {
                    target: channel,
                    modes: format!("{mode} {nick}"),
                });
            }
        }
        ParsedCommand::Echo { text } => session.windows().active().system(text),
        ParsedCommand::Raw { command } => {
            session.windows().status().system(format!("RAW {command}"));
            session.send(Action::SendRaw { command });
        }
    }
}
