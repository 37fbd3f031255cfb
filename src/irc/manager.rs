use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use irc::client::prelude::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::app::action::Action;
use crate::config::model::ServerConfig;
use crate::irc::connection::{spawn_connection, IrcConnection};
use crate::session::Session;

const QUIT_GRACE: Duration = Duration::from_secs(2);

/// Owns the server connection and turns queued [`Action`]s into protocol
/// commands.
pub struct IrcManager {
    config: ServerConfig,
    session: Arc<Session>,
    connection: Option<IrcConnection>,
}

impl IrcManager {
    pub fn new(config: ServerConfig, session: Arc<Session>) -> Self {
        Self {
            config,
            session,
            connection: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.as_ref().is_some_and(|c| !c.is_closed())
    }

    pub async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            self.session.windows().status().system("Already connected");
            return Ok(());
        }
        self.session.windows().status().system(format!(
            "Connecting to {} ({}:{})...",
            self.config.name, self.config.host, self.config.port
        ));
        let conn = spawn_connection(&self.config, self.session.clone()).await?;
        self.connection = Some(conn);
        Ok(())
    }

    pub async fn disconnect(&mut self, message: Option<&str>) {
        let Some(conn) = self.connection.take() else {
            return;
        };
        let message = message.unwrap_or(self.session.behavior().quit_message.as_str());
        if !conn.close(message, QUIT_GRACE).await {
            self.session.disconnected("quit");
        }
    }

    fn sender(&self) -> Result<&irc::client::Sender> {
        match &self.connection {
            Some(conn) if !conn.is_closed() => Ok(&conn.sender),
            _ => Err(anyhow!("not connected")),
        }
    }

    /// Carry out one action. Returns `Ok(false)` once the client should stop.
    pub async fn execute(&mut self, action: Action) -> Result<bool> {
        debug!(action = action.label(), "execute");
        match action {
            Action::Connect => self.connect().await?,
            Action::Disconnect { message } => self.disconnect(message.as_deref()).await,
            Action::Quit { message } => {
                self.disconnect(message.as_deref()).await;
                return Ok(false);
            }
            Action::Join { channel } => self.sender()?.send_join(&channel)?,
            Action::Part { channel, reason } => {
                self.sender()?.send(Command::PART(channel, reason))?;
            }
            Action::ChangeNick { nick } => self.sender()?.send(Command::NICK(nick))?,
            Action::SendPrivmsg { target, text } => {
                // no CTCP injection in outbound messages
                let clean = text.replace('\x01', "");
                self.sender()?.send_privmsg(&target, &clean)?;
            }
            Action::SendAction { target, text } => {
                let clean = text.replace('\x01', "");
                self.sender()?
                    .send_privmsg(&target, format!("\x01ACTION {clean}\x01"))?;
            }
            Action::SendNotice { target, text } => {
                let clean = text.replace('\x01', "");
                self.sender()?.send(Command::NOTICE(target, clean))?;
            }
            Action::SendCtcp { target, command } => {
                let clean = command.replace('\x01', "");
                self.sender()?.send_privmsg(&target, format!("\x01{clean}\x01"))?;
            }
            Action::SendKick { channel, user, reason } => {
                self.sender()?.send(Command::KICK(channel, user, reason))?;
            }
            Action::SendMode { target, modes } => {
                // the irc crate only offers typed ChannelMODE/UserMODE
                let raw = format!("MODE {target} {modes}");
                self.sender()?.send(Command::Raw(raw, vec![]))?;
            }
            Action::SetTopic { channel, text } => {
                self.sender()?.send(Command::TOPIC(channel, text))?;
            }
            Action::SendInvite { nick, channel } => {
                self.sender()?.send(Command::INVITE(nick, channel))?;
            }
            Action::SendWhois { nick } => self.sender()?.send(Command::WHOIS(None, nick))?,
            Action::Names { channel } => {
                self.sender()?.send(Command::NAMES(Some(channel), None))?;
            }
            Action::SendRaw { command } => self.sender()?.send(Command::Raw(command, vec![]))?,
        }
        Ok(true)
    }
}

/// Transport task: drain the outbound queue until a quit or until every
/// sender is gone. Failures are logged and never stop the loop.
pub async fn run(mut manager: IrcManager, mut rx: mpsc::UnboundedReceiver<Action>) {
    while let Some(action) = rx.recv().await {
        let label = action.label();
        match manager.execute(action).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => warn!(action = label, error = %e, "outbound action failed"),
        }
    }
    if manager.connection.is_some() {
        manager.disconnect(None).await;
    }
    info!("transport stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::session;

    fn manager() -> IrcManager {
        let (s, _rx) = session("me");
        IrcManager::new(ServerConfig::default(), Arc::new(s))
    }

    #[tokio::test]
    async fn test_actions_fail_while_disconnected() {
        let mut m = manager();
        let err = m
            .execute(Action::Join {
                channel: "#rust".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "not connected");
        assert!(!m.is_connected());
    }

    #[tokio::test]
    async fn test_quit_stops_even_when_disconnected() {
        let mut m = manager();
        assert!(!m.execute(Action::Quit { message: None }).await.unwrap());
        assert!(m.execute(Action::Disconnect { message: None }).await.unwrap());
    }

    #[tokio::test]
    async fn test_run_survives_failures_and_ends_on_quit() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Action::Names {
            channel: "#rust".into(),
        })
        .unwrap();
        tx.send(Action::Quit { message: None }).unwrap();
        tx.send(Action::Join {
            channel: "#never".into(),
        })
        .unwrap();
        // returns at the quit; the later join is never executed
        run(manager(), rx).await;
        assert!(tx.is_closed());
    }

    #[tokio::test]
    async fn test_run_ends_when_senders_drop() {
        let (tx, rx) = mpsc::unbounded_channel::<Action>();
        drop(tx);
        run(manager(), rx).await;
    }
}
