//! Diagnostic logging.
//!
//! Everything goes to a log file through `tracing-subscriber`'s fmt layer.
//! Records from this crate at or above the configured status level are also
//! forwarded to the main loop as [`AppEvent::StatusLog`] and end up in the
//! status window. Forwarding goes through a channel so a record emitted while
//! a window lock is held never needs that lock itself.

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context as _, Result};
use tokio::sync::mpsc::UnboundedSender;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::app::event::AppEvent;
use crate::config::model::LoggingConfig;

/// Install the global subscriber.
pub fn init(config: &LoggingConfig, events: UnboundedSender<AppEvent>) -> Result<()> {
    let path = config.file_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .with_context(|| format!("Invalid log level {:?}", config.level))?,
    };
    let status_level = config.status_level.parse().unwrap_or(Level::WARN);

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(StatusLayer::new(events, status_level))
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(())
}

/// Forwards this crate's log records to the status window.
pub struct StatusLayer {
    sender: UnboundedSender<AppEvent>,
    min_level: Level,
}

impl StatusLayer {
    pub fn new(sender: UnboundedSender<AppEvent>, min_level: Level) -> Self {
        Self { sender, min_level }
    }
}

impl<S: Subscriber> Layer<S> for StatusLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        // more severe levels compare lower
        if *meta.level() > self.min_level || !meta.target().starts_with(env!("CARGO_CRATE_NAME")) {
            return;
        }
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        // the main loop may already be gone during shutdown
        let _ = self.sender.send(AppEvent::StatusLog {
            level: *meta.level(),
            text: visitor.finish(),
        });
    }
}

/// Renders an event as `message key=value ...`.
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            format!("{}{}", self.message, self.fields)
        }
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}
