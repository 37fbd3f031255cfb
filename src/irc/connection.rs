use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::StreamExt;
use irc::client::prelude::*;
use tracing::{debug, error};

use super::event::IrcEvent;
use crate::config::model::ServerConfig;
use crate::session::Session;

pub struct IrcConnection {
    pub sender: irc::client::Sender,
    reader: tokio::task::JoinHandle<()>,
}

impl IrcConnection {
    pub fn is_closed(&self) -> bool {
        self.reader.is_finished()
    }

    /// Send QUIT and give the server `grace` to hang up. Returns `false` if
    /// the reader had to be aborted, in which case the session was not told.
    pub async fn close(mut self, message: &str, grace: Duration) -> bool {
        if let Err(e) = self.sender.send_quit(message) {
            debug!(error = %e, "quit not sent");
        }
        match tokio::time::timeout(grace, &mut self.reader).await {
            Ok(_) => true,
            Err(_) => {
                self.reader.abort();
                false
            }
        }
    }
}

/// Connect, register and start feeding server lines into `session`.
pub async fn spawn_connection(server: &ServerConfig, session: Arc<Session>) -> Result<IrcConnection> {
    let config = Config {
        server: Some(server.host.clone()),
        port: Some(server.port),
        use_tls: Some(server.tls),
        nickname: Some(server.nickname.clone()),
        alt_nicks: server.alt_nicks.clone(),
        username: server.username.clone(),
        realname: server.realname.clone(),
        password: server.password.clone(),
        channels: server.channels.clone(),
        dangerously_accept_invalid_certs: Some(server.accept_invalid_certs),
        version: Some(server.version.clone()),
        ..Config::default()
    };

    let mut client = Client::from_config(config)
        .await
        .with_context(|| format!("Failed to connect to {}:{}", server.host, server.port))?;
    client.identify().context("Failed to send registration")?;

    let sender = client.sender();
    let mut stream = client.stream()?;
    session.connected(client.current_nickname());

    let reader = tokio::spawn(async move {
        let mut reason = "connection closed".to_string();
        while let Some(result) = stream.next().await {
            match result {
                Ok(message) => {
                    debug!(line = %message.to_string().trim_end(), "recv");
                    session.reconcile(&IrcEvent::from_message(&message));
                }
                Err(e) => {
                    error!("connection error: {e}");
                    reason = e.to_string();
                    break;
                }
            }
        }
        session.disconnected(&reason);
    });

    Ok(IrcConnection { sender, reader })
}
