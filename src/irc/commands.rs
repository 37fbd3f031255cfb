//! User command parser.
//!
//! Parses `command arg1 arg2 ...` lines typed in command mode (or prefixed
//! with `/`) into typed [`ParsedCommand`] values. Group arguments are optional
//! wherever the active window can stand in for them.

use crate::irc::event::is_channel;

/// A parsed user command. Each variant corresponds to one command name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Help { command: Option<String> },
    Exit { message: Option<String> },
    Connect,
    Disconnect { message: Option<String> },
    SelectWindow { index: usize },
    CloseWindow { index: Option<usize> },
    Join { channel: Option<String> },
    Part { channel: Option<String>, reason: Option<String> },
    Invite { channel: Option<String>, nick: String },
    Topic { channel: Option<String>, text: Option<String> },
    Whois { nick: String },
    Names { channel: Option<String> },
    Nick { nick: String },
    Me { text: String },
    Msg { target: String, text: String },
    Ctcp { target: String, command: String },
    Notice { target: String, text: String },
    Kick { channel: Option<String>, nick: String, reason: Option<String> },
    Mode { target: Option<String>, modes: String },
    MemberMode { channel: Option<String>, mode: &'static str, nick: String },
    Echo { text: String },
    Raw { command: String },
}

/// Command names with a one-line description, in help order.
pub const COMMANDS: &[(&str, &str)] = &[
    ("help", "Show help. Usage: help [command]"),
    ("exit", "Quit the client. Usage: exit [message]"),
    ("connect", "Connect to the configured server"),
    ("disconnect", "Disconnect from the server. Usage: disconnect [message]"),
    ("w", "Switch to window number n. Usage: w <n>"),
    ("wc", "Close a window, the active one by default. Usage: wc [n]"),
    ("join", "Join a channel. Usage: join <#channel>"),
    ("part", "Leave a channel. Usage: part [#channel] [reason]"),
    ("invite", "Invite someone to a channel. Usage: invite <nick> [#channel]"),
    ("topic", "Show or change the topic. Usage: topic [#channel] [text]"),
    ("whois", "Look up a user. Usage: whois <nick>"),
    ("names", "Refresh the member list. Usage: names [#channel]"),
    ("nick", "Change your nickname. Usage: nick <nick>"),
    ("me", "Send an action. Usage: me <text>"),
    ("msg", "Send a message. Usage: msg <target> <text>"),
    ("ctcp", "Send a CTCP request. Usage: ctcp <target> [command]"),
    ("notice", "Send a notice. Usage: notice <target> <text>"),
    ("kick", "Kick someone. Usage: kick [#channel] <nick> [reason]"),
    ("mode", "Set modes. Usage: mode [target] <modes>"),
    ("ban", "Ban a mask. Usage: ban [#channel] <mask>"),
    ("unban", "Remove a ban. Usage: unban [#channel] <mask>"),
    ("op", "Give operator status. Usage: op [#channel] <nick>"),
    ("deop", "Take operator status. Usage: deop [#channel] <nick>"),
    ("voice", "Give voice. Usage: voice [#channel] <nick>"),
    ("devoice", "Take voice. Usage: devoice [#channel] <nick>"),
    ("mute", "Quiet someone. Usage: mute [#channel] <nick>"),
    ("unmute", "Unquiet someone. Usage: unmute [#channel] <nick>"),
    ("echo", "Write text to the current window. Usage: echo <text>"),
    ("raw", "Send a raw protocol line. Usage: raw <line>"),
];

pub fn describe(command: &str) -> Option<&'static str> {
    let command = canonical(command);
    COMMANDS
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, desc)| *desc)
}

fn canonical(command: &str) -> &str {
    match command {
        "?" => "help",
        "quit" => "exit",
        "quote" => "raw",
        "j" => "join",
        "leave" => "part",
        "query" => "msg",
        other => other,
    }
}

/// Split off an optional leading channel argument.
fn channel_first(rest: &str) -> (Option<String>, &str) {
    let rest = rest.trim_start();
    match rest.split_once(' ') {
        Some((first, tail)) if is_channel(first) => (Some(first.to_string()), tail.trim_start()),
        None if is_channel(rest) => (Some(rest.to_string()), ""),
        _ => (None, rest),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn first_word(s: &str) -> Option<String> {
    s.split_whitespace().next().map(str::to_string)
}

/// Parse a command line into a [`ParsedCommand`].
///
/// A leading `/` is accepted and ignored. Returns `None` for unknown commands
/// or when a required argument is missing. Command names are
/// case-insensitive.
pub fn parse_command(input: &str) -> Option<ParsedCommand> {
    let input = input.trim();
    let input = input.strip_prefix('/').unwrap_or(input);
    let (cmd, rest) = input.split_once(' ').unwrap_or((input, ""));
    let cmd = cmd.to_lowercase();
    let rest = rest.trim_start();

    match canonical(&cmd) {
        "help" => Some(ParsedCommand::Help {
            command: first_word(rest).map(|c| c.to_lowercase()),
        }),
        "exit" => Some(ParsedCommand::Exit {
            message: non_empty(rest),
        }),
        "connect" => Some(ParsedCommand::Connect),
        "disconnect" => Some(ParsedCommand::Disconnect {
            message: non_empty(rest),
        }),
        "w" => {
            let index = first_word(rest)?.parse().ok()?;
            Some(ParsedCommand::SelectWindow { index })
        }
        "wc" => {
            let index = match first_word(rest) {
                Some(word) => Some(word.parse().ok()?),
                None => None,
            };
            Some(ParsedCommand::CloseWindow { index })
        }
        "join" => {
            let channel = first_word(rest).map(|c| {
                if is_channel(&c) {
                    c
                } else {
                    format!("#{c}")
                }
            });
            Some(ParsedCommand::Join { channel })
        }
        "part" => {
            let (channel, reason) = channel_first(rest);
            Some(ParsedCommand::Part {
                channel,
                reason: non_empty(reason),
            })
        }
        "invite" => {
            let mut words = rest.split_whitespace();
            let nick = words.next()?.to_string();
            let channel = words.next().map(str::to_string);
            Some(ParsedCommand::Invite { channel, nick })
        }
        "topic" => {
            let (channel, text) = channel_first(rest);
            Some(ParsedCommand::Topic {
                channel,
                text: non_empty(text),
            })
        }
        "whois" => Some(ParsedCommand::Whois {
            nick: first_word(rest)?,
        }),
        "names" => Some(ParsedCommand::Names {
            channel: first_word(rest),
        }),
        "nick" => Some(ParsedCommand::Nick {
            nick: first_word(rest)?,
        }),
        "me" => Some(ParsedCommand::Me {
            text: non_empty(rest)?,
        }),
        "msg" => {
            let (target, text) = rest.split_once(' ')?;
            Some(ParsedCommand::Msg {
                target: target.to_string(),
                text: non_empty(text)?,
            })
        }
        "ctcp" => {
            let mut words = rest.splitn(2, ' ');
            let target = words.next().filter(|t| !t.is_empty())?.to_string();
            let command = words
                .next()
                .and_then(non_empty)
                .map_or_else(|| "VERSION".to_string(), |c| c.to_uppercase());
            Some(ParsedCommand::Ctcp { target, command })
        }
        "notice" => {
            let (target, text) = rest.split_once(' ')?;
            Some(ParsedCommand::Notice {
                target: target.to_string(),
                text: non_empty(text)?,
            })
        }
        "kick" => {
            let (channel, rest) = channel_first(rest);
            let (nick, reason) = rest.split_once(' ').unwrap_or((rest, ""));
            let nick = non_empty(nick)?;
            Some(ParsedCommand::Kick {
                channel,
                nick,
                reason: non_empty(reason),
            })
        }
        "mode" => {
            let (target, modes) = match rest.split_once(' ') {
                Some((first, tail)) if !first.starts_with(['+', '-']) => {
                    (Some(first.to_string()), tail.trim())
                }
                _ => (None, rest.trim()),
            };
            if modes.is_empty() {
                return None;
            }
            Some(ParsedCommand::Mode {
                target,
                modes: modes.to_string(),
            })
        }
        name @ ("ban" | "unban" | "op" | "deop" | "voice" | "devoice" | "mute" | "unmute") => {
            let mode = match name {
                "ban" => "+b",
                "unban" => "-b",
                "op" => "+o",
                "deop" => "-o",
                "voice" => "+v",
                "devoice" => "-v",
                "mute" => "+q",
                _ => "-q",
            };
            let (channel, rest) = channel_first(rest);
            Some(ParsedCommand::MemberMode {
                channel,
                mode,
                nick: first_word(rest)?,
            })
        }
        "echo" => Some(ParsedCommand::Echo {
            text: rest.to_string(),
        }),
        "raw" => Some(ParsedCommand::Raw {
            command: non_empty(rest)?,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slash_prefix_optional() {
        assert_eq!(parse_command("/connect"), Some(ParsedCommand::Connect));
        assert_eq!(parse_command("CONNECT"), Some(ParsedCommand::Connect));
        assert_eq!(parse_command("bogus"), None);
    }

    #[test]
    fn test_window_commands() {
        assert_eq!(
            parse_command("w 3"),
            Some(ParsedCommand::SelectWindow { index: 3 })
        );
        assert_eq!(parse_command("w"), None);
        assert_eq!(parse_command("w x"), None);
        assert_eq!(
            parse_command("wc"),
            Some(ParsedCommand::CloseWindow { index: None })
        );
        assert_eq!(
            parse_command("wc 2"),
            Some(ParsedCommand::CloseWindow { index: Some(2) })
        );
    }

    #[test]
    fn test_join_adds_prefix() {
        assert_eq!(
            parse_command("join rust"),
            Some(ParsedCommand::Join {
                channel: Some("#rust".into())
            })
        );
        assert_eq!(
            parse_command("j &local"),
            Some(ParsedCommand::Join {
                channel: Some("&local".into())
            })
        );
        assert_eq!(parse_command("join"), Some(ParsedCommand::Join { channel: None }));
    }

    #[test]
    fn test_part_with_optional_channel() {
        assert_eq!(
            parse_command("part #rust see you"),
            Some(ParsedCommand::Part {
                channel: Some("#rust".into()),
                reason: Some("see you".into())
            })
        );
        assert_eq!(
            parse_command("part see you"),
            Some(ParsedCommand::Part {
                channel: None,
                reason: Some("see you".into())
            })
        );
        assert_eq!(
            parse_command("part"),
            Some(ParsedCommand::Part {
                channel: None,
                reason: None
            })
        );
    }

    #[test]
    fn test_kick() {
        assert_eq!(
            parse_command("kick bob"),
            Some(ParsedCommand::Kick {
                channel: None,
                nick: "bob".into(),
                reason: None
            })
        );
        assert_eq!(
            parse_command("kick #rust bob go away"),
            Some(ParsedCommand::Kick {
                channel: Some("#rust".into()),
                nick: "bob".into(),
                reason: Some("go away".into())
            })
        );
        assert_eq!(parse_command("kick #rust"), None);
        assert_eq!(parse_command("kick"), None);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            parse_command("msg bob hello there"),
            Some(ParsedCommand::Msg {
                target: "bob".into(),
                text: "hello there".into()
            })
        );
        assert_eq!(parse_command("msg bob"), None);
        assert_eq!(
            parse_command("me waves"),
            Some(ParsedCommand::Me {
                text: "waves".into()
            })
        );
        assert_eq!(parse_command("me"), None);
        assert_eq!(
            parse_command("ctcp bob"),
            Some(ParsedCommand::Ctcp {
                target: "bob".into(),
                command: "VERSION".into()
            })
        );
        assert_eq!(
            parse_command("ctcp bob time"),
            Some(ParsedCommand::Ctcp {
                target: "bob".into(),
                command: "TIME".into()
            })
        );
    }

    #[test]
    fn test_member_mode_shortcuts() {
        assert_eq!(
            parse_command("op bob"),
            Some(ParsedCommand::MemberMode {
                channel: None,
                mode: "+o",
                nick: "bob".into()
            })
        );
        assert_eq!(
            parse_command("unban #rust *!*@spam"),
            Some(ParsedCommand::MemberMode {
                channel: Some("#rust".into()),
                mode: "-b",
                nick: "*!*@spam".into()
            })
        );
        assert_eq!(parse_command("voice"), None);
    }

    #[test]
    fn test_mode_and_topic() {
        assert_eq!(
            parse_command("mode +m"),
            Some(ParsedCommand::Mode {
                target: None,
                modes: "+m".into()
            })
        );
        assert_eq!(
            parse_command("mode #rust +o bob"),
            Some(ParsedCommand::Mode {
                target: Some("#rust".into()),
                modes: "+o bob".into()
            })
        );
        assert_eq!(parse_command("mode"), None);
        assert_eq!(
            parse_command("topic #rust new topic"),
            Some(ParsedCommand::Topic {
                channel: Some("#rust".into()),
                text: Some("new topic".into())
            })
        );
        assert_eq!(
            parse_command("topic"),
            Some(ParsedCommand::Topic {
                channel: None,
                text: None
            })
        );
    }

    #[test]
    fn test_aliases_and_help() {
        assert_eq!(
            parse_command("quit bye"),
            Some(ParsedCommand::Exit {
                message: Some("bye".into())
            })
        );
        assert_eq!(
            parse_command("quote PING x"),
            Some(ParsedCommand::Raw {
                command: "PING x".into()
            })
        );
        assert_eq!(
            parse_command("? KICK"),
            Some(ParsedCommand::Help {
                command: Some("kick".into())
            })
        );
        assert!(describe("kick").is_some());
        assert!(describe("quit").is_some());
        assert!(describe("nope").is_none());
    }
}
