use crossterm::event::Event as CrosstermEvent;
use tracing::Level;

#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    /// A log record to mirror into the status window
    StatusLog { level: Level, text: String },
}
