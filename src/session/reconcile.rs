//! Applies inbound protocol events to session state.
//!
//! Events from one connection are applied in arrival order by the connection
//! reader. Every handler resolves the windows it needs once, then mutates
//! them through their handles; nothing here blocks on the network.

use chrono::{DateTime, Local};
use tracing::{debug, error, warn};

use super::roster::Privilege;
use super::window::{Message, MessageKind, WindowHandle, WindowKind};
use super::Session;
use crate::app::action::Action;
use crate::irc::event::{is_channel, IrcEvent};

const ERROR_CODES: &[&str] = &["401", "403", "404", "405", "406", "407", "408", "421"];
const WHOIS_CODES: &[&str] = &["311", "312", "313", "314", "317", "318", "319", "369"];

fn reason_suffix(reason: &str, default: &str) -> String {
    if reason.is_empty() || reason == default {
        String::new()
    } else {
        format!(" ({reason})")
    }
}

impl Session {
    pub fn reconcile(&self, ev: &IrcEvent) {
        match ev.code.as_str() {
            "PRIVMSG" => self.on_privmsg(ev, MessageKind::Normal),
            "CTCP_ACTION" => self.on_privmsg(ev, MessageKind::Action),
            "CTCP" => self.on_ctcp(ev),
            "NOTICE" | "CTCP_REPLY" => self.on_notice(ev),
            "JOIN" => self.on_join(ev),
            "PART" => self.on_part(ev),
            "KICK" => self.on_kick(ev),
            "QUIT" => self.on_quit(ev),
            "NICK" => self.on_nick(ev),
            "TOPIC" => self.on_topic(ev),
            "MODE" => self.on_mode(ev),
            "001" => self.on_welcome(ev),
            "324" => self.on_channel_modes(ev),
            "329" => self.on_channel_created(ev),
            "331" | "332" => self.on_topic_reply(ev),
            "333" => {}
            "353" => self.on_names_reply(ev),
            "366" => self.on_names_end(ev),
            "PING" | "PONG" | "CAP" | "ERROR" => debug!(code = %ev.code, "ignored"),
            code if ERROR_CODES.contains(&code) => {
                error!("{}: {}", ev.arg(1), ev.message);
            }
            code if WHOIS_CODES.contains(&code) => self.on_whois(ev),
            _ if ev.is_numeric() => self.on_numeric(ev),
            _ => debug!(code = %ev.code, "unhandled event"),
        }

        if matches!(ev.code.as_str(), "JOIN" | "PART" | "KICK") {
            self.refresh_names(ev);
        }
    }

    /// Ask for a fresh member list after someone else joined, left or was
    /// kicked. Our own membership changes are answered by the server anyway.
    fn refresh_names(&self, ev: &IrcEvent) {
        if !self.behavior.refresh_names || !is_channel(&ev.target) {
            return;
        }
        let subject = if ev.code == "KICK" { ev.arg(1) } else { ev.nick.as_str() };
        if self.is_me(subject) {
            return;
        }
        self.send(Action::Names {
            channel: ev.target.clone(),
        });
    }

    fn on_privmsg(&self, ev: &IrcEvent, kind: MessageKind) {
        let direct = self.is_me(&ev.target);
        let window = if direct {
            if ev.nick.is_empty() {
                warn!(to = %ev.target, "direct message without a sender");
                return;
            }
            let (window, created) = self.windows.open(WindowKind::Direct, &ev.nick);
            if created {
                debug!(nick = %ev.nick, "opened direct window");
            }
            window
        } else {
            match self.windows.named(&ev.target) {
                Some(window) => window,
                None => {
                    warn!(to = %ev.target, nick = %ev.nick, "received message with no window");
                    return;
                }
            }
        };
        let me = self.nickname();
        let mentions_me = !me.is_empty()
            && ev
                .message
                .to_ascii_lowercase()
                .contains(&me.to_ascii_lowercase());
        window.push(Message::new(&ev.nick, &ev.message, kind));
        if direct || mentions_me {
            window.notice();
        }
    }

    fn on_ctcp(&self, ev: &IrcEvent) {
        let status = self.windows.status();
        status.push(Message::new(
            &ev.nick,
            format!("CTCP {} -> {}", ev.message, ev.target),
            MessageKind::Notice,
        ));
    }

    fn on_notice(&self, ev: &IrcEvent) {
        let window = if is_channel(&ev.target) {
            self.windows.named(&ev.target)
        } else {
            self.windows.named(&ev.nick).filter(|w| w.kind() == WindowKind::Direct)
        }
        .unwrap_or_else(|| self.windows.status());

        let text = if ev.code == "CTCP_REPLY" {
            format!("CTCP {}", ev.message)
        } else {
            ev.message.clone()
        };
        window.push(Message::new(&ev.nick, text, MessageKind::Notice));
        if !window.is_status() {
            window.notice();
        }
    }

    fn on_join(&self, ev: &IrcEvent) {
        let channel = &ev.target;
        if channel.is_empty() {
            warn!(nick = %ev.nick, "join without a channel");
            return;
        }
        let (window, _) = self.windows.open(WindowKind::Group, channel);
        if self.is_me(&ev.nick) {
            let _ = self.windows.select(&window);
        } else {
            window.add_user(&ev.nick, Privilege::None);
        }
        window.push(Message::event(
            MessageKind::Join,
            format!("{} joined {}", ev.nick, channel),
        ));
    }

    fn on_part(&self, ev: &IrcEvent) {
        let me = self.is_me(&ev.nick);
        let Some(window) = self.windows.named(&ev.target) else {
            if !me {
                error!(to = %ev.target, nick = %ev.nick, "received part with no window");
            }
            return;
        };
        if me {
            self.close_window(&window);
            return;
        }
        window.delete_user(&ev.nick);
        window.push(Message::event(
            MessageKind::Part,
            format!(
                "{} left {}{}",
                ev.nick,
                ev.target,
                reason_suffix(&ev.message, &ev.target)
            ),
        ));
    }

    fn on_kick(&self, ev: &IrcEvent) {
        let channel = &ev.target;
        let kicked = ev.arg(1);
        if kicked.is_empty() {
            warn!(channel = %channel, "kick without a nickname");
            return;
        }
        let me = self.is_me(kicked);
        if me && self.behavior.auto_rejoin_on_kick {
            self.rejoins.schedule(channel, self.outbound.clone());
        }
        let Some(window) = self.windows.named(channel) else {
            error!(channel = %channel, kicked, "received kick with no window");
            return;
        };
        if me {
            window.notice();
        } else {
            window.delete_user(kicked);
        }
        window.push(Message::event(
            MessageKind::Kick,
            format!(
                "{} kicked {} from {}{}",
                ev.nick,
                kicked,
                channel,
                reason_suffix(&ev.message, kicked)
            ),
        ));
    }

    fn on_quit(&self, ev: &IrcEvent) {
        let me = self.is_me(&ev.nick);
        for window in self.windows.windows() {
            let line = || {
                let text = if me {
                    format!("Quit: {}", ev.message)
                } else {
                    format!("{} quit ({})", ev.nick, ev.message)
                };
                Message::event(MessageKind::Quit, text)
            };
            if me {
                window.push(line());
                continue;
            }
            let affected = match window.kind() {
                WindowKind::Group => window.delete_user(&ev.nick),
                WindowKind::Direct => window.title().eq_ignore_ascii_case(&ev.nick),
                WindowKind::Status => false,
            };
            if affected {
                window.push(line());
            }
        }
    }

    fn on_nick(&self, ev: &IrcEvent) {
        let (old, new) = (ev.nick.as_str(), ev.message.as_str());
        if old.is_empty() || new.is_empty() {
            warn!(old, new, "malformed nick change");
            return;
        }
        let me = self.rename_self(old, new);
        let line = || Message::event(MessageKind::Nick, format!("{old} is now known as {new}"));
        for window in self.windows.windows() {
            match window.kind() {
                WindowKind::Group => {
                    if window.update_user(old, new) {
                        window.push(line());
                    }
                }
                WindowKind::Direct => {
                    if window.title().eq_ignore_ascii_case(old) {
                        self.rename_direct(&window, new);
                        window.push(line());
                    }
                }
                WindowKind::Status => {
                    if me {
                        window.push(Message::event(
                            MessageKind::Nick,
                            format!("You are now known as {new}"),
                        ));
                    }
                }
            }
        }
        if me {
            self.dirty.mark();
        }
    }

    fn rename_direct(&self, window: &WindowHandle, new: &str) {
        if let Err(e) = self.windows.rename(window, new) {
            warn!(title = %window.title(), new, error = %e, "failed to rename direct window");
        }
    }

    fn on_topic(&self, ev: &IrcEvent) {
        let Some(window) = self.windows.named(&ev.target) else {
            warn!(channel = %ev.target, "topic for unknown window");
            return;
        };
        window.set_topic(&ev.message);
        window.push(Message::event(
            MessageKind::Topic,
            format!("{} changed topic on {} to: {}", ev.nick, ev.target, ev.message),
        ));
    }

    fn on_topic_reply(&self, ev: &IrcEvent) {
        let channel = ev.arg(1);
        let Some(window) = self.windows.named(channel) else {
            debug!(channel, "topic reply for unknown window");
            return;
        };
        if ev.code == "331" {
            window.set_topic("");
            window.push(Message::event(
                MessageKind::Topic,
                format!("No topic is set in {channel}"),
            ));
        } else {
            let topic = ev.arg(2);
            window.set_topic(topic);
            window.push(Message::event(
                MessageKind::Topic,
                format!("Topic for {channel} is: {topic}"),
            ));
        }
    }

    fn on_mode(&self, ev: &IrcEvent) {
        let modes = ev.args.get(1..).map(|a| a.join(" ")).unwrap_or_default();
        if !is_channel(&ev.target) {
            self.windows.status().push(Message::event(
                MessageKind::Mode,
                format!("Changed mode for {} ({})", ev.target, modes),
            ));
            return;
        }
        let Some(window) = self.windows.named(&ev.target) else {
            warn!(channel = %ev.target, "mode change for unknown window");
            return;
        };
        for (nick, adding, privilege) in member_modes(ev.args.get(1..).unwrap_or_default()) {
            let current = window.privilege_of(nick).unwrap_or_default();
            let updated = if adding {
                current.max(privilege)
            } else if current == privilege {
                Privilege::None
            } else {
                current
            };
            window.set_privilege(nick, updated);
        }
        window.push(Message::event(
            MessageKind::Mode,
            format!("{} changed mode on {} ({})", ev.nick, ev.target, modes),
        ));
    }

    fn on_channel_modes(&self, ev: &IrcEvent) {
        let channel = ev.arg(1);
        let Some(window) = self.windows.named(channel) else {
            debug!(channel, "mode reply for unknown window");
            return;
        };
        let modes = ev.args.get(2..).map(|a| a.join(" ")).unwrap_or_default();
        window.set_modes(&modes);
        window.push(Message::event(
            MessageKind::Mode,
            format!("Modes for {channel}: {modes}"),
        ));
    }

    fn on_channel_created(&self, ev: &IrcEvent) {
        let channel = ev.arg(1);
        let Some(window) = self.windows.named(channel) else {
            return;
        };
        let created = ev
            .arg(2)
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
        match created {
            Some(when) => window.system(format!(
                "Channel created at {}",
                when.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
            )),
            None => warn!(channel, raw = ev.arg(2), "unparseable channel creation time"),
        }
    }

    fn on_welcome(&self, ev: &IrcEvent) {
        let nick = ev.arg(0);
        if !nick.is_empty() {
            self.set_nickname(nick);
        }
        self.windows.status().system(ev.message.clone());
    }

    fn on_names_reply(&self, ev: &IrcEvent) {
        let channel = ev.arg(2);
        if self.windows.named(channel).is_none() {
            warn!(channel, "names reply for unknown window");
            return;
        }
        self.names.push(channel, ev.arg(3).split_whitespace());
    }

    fn on_names_end(&self, ev: &IrcEvent) {
        let channel = ev.arg(1);
        let tokens = self.names.take(channel);
        match self.windows.named(channel) {
            Some(window) if window.has_roster() => window.set_users(tokens),
            Some(_) => warn!(channel, "names for a window without a roster"),
            None => warn!(channel, "end of names for unknown window"),
        }
    }

    fn on_whois(&self, ev: &IrcEvent) {
        let nick = ev.arg(1);
        let data = ev.args.get(2..).map(|a| a.join(" ")).unwrap_or_default();
        self.windows
            .status()
            .system(format!("WHOIS {nick} => {data}"));
    }

    fn on_numeric(&self, ev: &IrcEvent) {
        let text = ev.args.get(1..).map(|a| a.join(" ")).unwrap_or_default();
        if !text.is_empty() {
            self.windows.status().system(text);
        }
    }
}

/// Member privilege changes in a channel MODE: `(nick, adding, privilege)`.
fn member_modes(args: &[String]) -> Vec<(&str, bool, Privilege)> {
    let Some((modes, params)) = args.split_first() else {
        return Vec::new();
    };
    let mut params = params.iter();
    let mut adding = true;
    let mut changes = Vec::new();
    for c in modes.chars() {
        match c {
            '+' => adding = true,
            '-' => adding = false,
            'q' | 'a' | 'o' | 'h' | 'v' => {
                let Some(nick) = params.next() else { break };
                let privilege = if matches!(c, 'h' | 'v') {
                    Privilege::Voice
                } else {
                    Privilege::Operator
                };
                changes.push((nick.as_str(), adding, privilege));
            }
            'b' | 'e' | 'I' | 'k' => {
                params.next();
            }
            'l' if adding => {
                params.next();
            }
            _ => {}
        }
    }
    changes
}
