mod app;
mod config;
mod irc;
mod logging;
mod session;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::{handler, App};
use crate::irc::manager::IrcManager;
use crate::session::signal::DirtyFlag;
use crate::session::{Outbound, Session};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    let cfg = config::load_config()?;

    let (event_tx, event_rx) = mpsc::unbounded_channel::<AppEvent>();
    logging::init(&cfg.logging, event_tx.clone())?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, cfg, event_tx, event_rx).await;

    restore_terminal()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: config::AppConfig,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    mut event_rx: mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let dirty = DirtyFlag::new();
    let (outbound, action_rx) = Outbound::channel();
    let session = Arc::new(Session::new(
        cfg.behavior.clone(),
        &cfg.ui,
        outbound,
        dirty.clone(),
    ));

    let transport = tokio::spawn(irc::manager::run(
        IrcManager::new(cfg.server.clone(), session.clone()),
        action_rx,
    ));

    // Spawn terminal input task
    let term_tx = event_tx;
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(Ok(event)) = reader.next().await {
            if term_tx.send(AppEvent::Terminal(event)).is_err() {
                break;
            }
        }
    });

    let status = session.windows().status();
    status.system("Welcome to irctabs.");
    if cfg.server.auto_connect {
        session.send(Action::Connect);
    } else {
        status.system(format!(
            "Type /connect to connect to {}:{} as {}, /help for commands.",
            cfg.server.host, cfg.server.port, cfg.server.nickname
        ));
    }

    let render_delay = Duration::from_millis(cfg.ui.render_delay_ms);
    let mut app = App::new(session, cfg);
    draw(terminal, &app)?;

    let mut settled = Box::pin(dirty.settled(render_delay));
    loop {
        tokio::select! {
            () = &mut settled => {
                draw(terminal, &app)?;
                settled = Box::pin(dirty.settled(render_delay));
            }
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                handler::handle_event(&mut app, event);
                if app.should_quit {
                    break;
                }
            }
        }
    }

    // the quit action is already queued; let the transport say goodbye
    if tokio::time::timeout(SHUTDOWN_GRACE, transport).await.is_err() {
        warn!("transport did not stop in time");
    }
    Ok(())
}

fn draw(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &App) -> Result<()> {
    terminal.draw(|frame| {
        let view = ui::View::capture(app, ui::message_rows(frame.area()));
        ui::render(frame, &view);
    })?;
    Ok(())
}
