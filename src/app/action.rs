/// Outbound work for the transport task. Queued by `Session::send`, never
/// awaited by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Connect,
    Disconnect { message: Option<String> },
    Join { channel: String },
    Part { channel: String, reason: Option<String> },
    ChangeNick { nick: String },
    SendPrivmsg { target: String, text: String },
    SendAction { target: String, text: String },
    SendNotice { target: String, text: String },
    SendCtcp { target: String, command: String },
    SendKick { channel: String, user: String, reason: Option<String> },
    SendMode { target: String, modes: String },
    SetTopic { channel: String, text: Option<String> },
    SendInvite { nick: String, channel: String },
    SendWhois { nick: String },
    Names { channel: String },
    SendRaw { command: String },
    Quit { message: Option<String> },
}

impl Action {
    /// Short name for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Connect => "connect",
            Action::Disconnect { .. } => "disconnect",
            Action::Join { .. } => "join",
            Action::Part { .. } => "part",
            Action::ChangeNick { .. } => "nick",
            Action::SendPrivmsg { .. } => "privmsg",
            Action::SendAction { .. } => "action",
            Action::SendNotice { .. } => "notice",
            Action::SendCtcp { .. } => "ctcp",
            Action::SendKick { .. } => "kick",
            Action::SendMode { .. } => "mode",
            Action::SetTopic { .. } => "topic",
            Action::SendInvite { .. } => "invite",
            Action::SendWhois { .. } => "whois",
            Action::Names { .. } => "names",
            Action::SendRaw { .. } => "raw",
            Action::Quit { .. } => "quit",
        }
    }
}
