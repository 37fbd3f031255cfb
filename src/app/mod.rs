//! Terminal front-end: input editing, key handling and command dispatch on top
//! of the shared [`Session`].

pub mod action;
pub mod dispatch;
pub mod event;
pub mod handler;
pub mod input;

use std::sync::Arc;

use crate::config::model::AppConfig;
use crate::session::completion::NameCompleter;
use crate::session::Session;
use input::InputState;

pub struct App {
    pub session: Arc<Session>,
    pub config: AppConfig,
    pub input: InputState,
    pub completer: NameCompleter,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: Arc<Session>, config: AppConfig) -> Self {
        let completer = NameCompleter::new(config.behavior.completion_suffix.clone());
        Self {
            session,
            config,
            input: InputState::default(),
            completer,
            should_quit: false,
        }
    }
}
