//! Flat view of an inbound IRC message.
//!
//! The session reconciler works on [`IrcEvent`] rather than the `irc` crate's
//! typed `Command`, so that every message, including numerics the crate has no
//! variant for, arrives in the same shape.

use irc::client::prelude::{Command, Message, Mode, Prefix};
use irc::proto::mode::ModeType;

const CTCP_DELIM: char = '\x01';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IrcEvent {
    /// Command name or three-digit numeric, uppercase. CTCP requests are
    /// reported as `CTCP_ACTION`, `CTCP` and `CTCP_REPLY`.
    pub code: String,
    /// Nickname part of the prefix, or the server name.
    pub nick: String,
    /// Full prefix, `nick!user@host`.
    pub host: String,
    /// Host part of the prefix.
    pub source: String,
    /// First parameter.
    pub target: String,
    /// Free text of the message (reason, topic, body), CTCP framing removed.
    pub message: String,
    pub args: Vec<String>,
}

impl IrcEvent {
    pub fn from_message(message: &Message) -> Self {
        let (nick, source) = match &message.prefix {
            Some(Prefix::Nickname(nick, _, host)) => (nick.clone(), host.clone()),
            Some(Prefix::ServerName(name)) => (name.clone(), name.clone()),
            None => Default::default(),
        };
        let host = message
            .prefix
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();

        let (code, args, message) = match &message.command {
            Command::PRIVMSG(target, text) => privmsg(target, text),
            Command::NOTICE(target, text) => match ctcp_body(text) {
                Some(inner) => ("CTCP_REPLY".into(), vec![target.clone(), text.clone()], inner),
                None => ("NOTICE".into(), vec![target.clone(), text.clone()], text.clone()),
            },
            Command::JOIN(channel, _, _) => ("JOIN".into(), vec![channel.clone()], String::new()),
            Command::PART(channel, reason) => {
                let mut args = vec![channel.clone()];
                args.extend(reason.clone());
                ("PART".into(), args, reason.clone().unwrap_or_default())
            }
            Command::KICK(channel, user, reason) => {
                let mut args = vec![channel.clone(), user.clone()];
                args.extend(reason.clone());
                ("KICK".into(), args, reason.clone().unwrap_or_default())
            }
            Command::QUIT(reason) => (
                "QUIT".into(),
                reason.iter().cloned().collect(),
                reason.clone().unwrap_or_default(),
            ),
            Command::NICK(new) => ("NICK".into(), vec![new.clone()], new.clone()),
            Command::TOPIC(channel, topic) => {
                let mut args = vec![channel.clone()];
                args.extend(topic.clone());
                ("TOPIC".into(), args, topic.clone().unwrap_or_default())
            }
            Command::ChannelMODE(target, modes) => mode(target, modes),
            Command::UserMODE(target, modes) => mode(target, modes),
            Command::PING(server, _) => ("PING".into(), vec![server.clone()], server.clone()),
            Command::PONG(server, _) => ("PONG".into(), vec![server.clone()], server.clone()),
            Command::ERROR(text) => ("ERROR".into(), vec![text.clone()], text.clone()),
            Command::Response(resp, args) => (
                format!("{:03}", *resp as u16),
                args.clone(),
                args.last().cloned().unwrap_or_default(),
            ),
            Command::Raw(name, args) => (
                name.to_ascii_uppercase(),
                args.clone(),
                args.last().cloned().unwrap_or_default(),
            ),
            other => (command_name(other), Vec::new(), String::new()),
        };

        IrcEvent {
            code,
            nick,
            host,
            source,
            target: args.first().cloned().unwrap_or_default(),
            message,
            args,
        }
    }

    pub fn arg(&self, index: usize) -> &str {
        self.args.get(index).map_or("", String::as_str)
    }

    pub fn is_numeric(&self) -> bool {
        self.code.len() == 3 && self.code.bytes().all(|b| b.is_ascii_digit())
    }
}

fn privmsg(target: &str, text: &str) -> (String, Vec<String>, String) {
    let args = vec![target.to_string(), text.to_string()];
    let Some(inner) = ctcp_body(text) else {
        return ("PRIVMSG".into(), args, text.to_string());
    };
    match inner.split_once(' ') {
        Some(("ACTION", action)) => ("CTCP_ACTION".into(), args, action.to_string()),
        None if inner == "ACTION" => ("CTCP_ACTION".into(), args, String::new()),
        _ => ("CTCP".into(), args, inner),
    }
}

/// Body of a CTCP-framed text. The closing delimiter is optional.
fn ctcp_body(text: &str) -> Option<String> {
    text.strip_prefix(CTCP_DELIM)
        .map(|m| m.strip_suffix(CTCP_DELIM).unwrap_or(m).to_string())
}

/// Rebuild the mode change as one flag string followed by its parameters,
/// `["#rust", "+o-v", "alice", "bob"]`.
fn mode<T: ModeType>(target: &str, modes: &[Mode<T>]) -> (String, Vec<String>, String) {
    let flags: String = modes.iter().map(Mode::flag).collect();
    let mut args = vec![target.to_string()];
    if !flags.is_empty() {
        args.push(flags);
    }
    args.extend(modes.iter().filter_map(Mode::arg).map(str::to_string));
    let message = args.last().cloned().unwrap_or_default();
    ("MODE".into(), args, message)
}

/// Name of a command the reconciler has no use for, for logging only.
fn command_name(command: &Command) -> String {
    String::from(command)
        .split(' ')
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase()
}

/// Whether `name` is a group (channel) name rather than a nickname.
pub fn is_channel(name: &str) -> bool {
    name.starts_with('#') || name.starts_with('&')
}

#[cfg(test)]
pub(crate) fn event(line: &str) -> IrcEvent {
    let message: Message = line.parse().expect("valid irc line");
    IrcEvent::from_message(&message)
}
