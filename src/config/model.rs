//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a sensible default so the client works out of the box.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::nickname::generate_nickname;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The IRC server to connect to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// User-facing label (e.g. `"libera"`).
    #[serde(default = "default_server_name")]
    pub name: String,
    /// Hostname or IP address of the IRC server.
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub tls: bool,
    #[serde(default = "default_nickname")]
    pub nickname: String,
    #[serde(default)]
    pub alt_nicks: Vec<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub realname: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Channels joined right after registration.
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub auto_connect: bool,
    #[serde(default)]
    pub accept_invalid_certs: bool,
    /// Reply to CTCP VERSION requests.
    #[serde(default = "default_version_string")]
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            host: default_host(),
            port: default_port(),
            tls: true,
            nickname: default_nickname(),
            alt_nicks: vec![],
            username: None,
            realname: None,
            password: None,
            channels: vec![],
            auto_connect: false,
            accept_invalid_certs: false,
            version: default_version_string(),
        }
    }
}

/// Display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    /// Lines kept per window; `0` keeps everything.
    #[serde(default)]
    pub max_scrollback: usize,
    /// Lines moved by PageUp/PageDown.
    #[serde(default = "default_scroll_page")]
    pub scroll_page: u16,
    /// Quiet period before a burst of changes is drawn.
    #[serde(default = "default_render_delay")]
    pub render_delay_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
            max_scrollback: 0,
            scroll_page: default_scroll_page(),
            render_delay_ms: default_render_delay(),
        }
    }
}

/// Client behavior settings (auto-rejoin, completion, default messages).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorConfig {
    #[serde(default = "default_true")]
    pub auto_rejoin_on_kick: bool,
    #[serde(default = "default_rejoin_delay")]
    pub rejoin_delay_secs: u64,
    /// Request a fresh NAMES list after others join, part or get kicked.
    #[serde(default = "default_true")]
    pub refresh_names: bool,
    #[serde(default = "default_completion_suffix")]
    pub completion_suffix: String,
    #[serde(default = "default_quit_message")]
    pub quit_message: String,
    #[serde(default = "default_part_message")]
    pub part_message: String,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            auto_rejoin_on_kick: true,
            rejoin_delay_secs: default_rejoin_delay(),
            refresh_names: true,
            completion_suffix: default_completion_suffix(),
            quit_message: default_quit_message(),
            part_message: default_part_message(),
        }
    }
}

/// Diagnostic log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log file; defaults to `irctabs.log` in the platform data directory.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// `EnvFilter` directive for the log file. `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Records at or above this level are also shown in the status window.
    #[serde(default = "default_status_level")]
    pub status_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: default_log_level(),
            status_level: default_status_level(),
        }
    }
}

impl LoggingConfig {
    pub fn file_path(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("irctabs")
                .join("irctabs.log")
        })
    }
}

fn default_server_name() -> String {
    "libera".to_string()
}
fn default_host() -> String {
    "irc.libera.chat".to_string()
}
fn default_nickname() -> String {
    generate_nickname()
}
fn default_port() -> u16 {
    6697
}
fn default_true() -> bool {
    true
}
fn default_timestamp_format() -> String {
    "%H:%M".to_string()
}
fn default_scroll_page() -> u16 {
    10
}
fn default_render_delay() -> u64 {
    16
}
fn default_rejoin_delay() -> u64 {
    2
}
fn default_completion_suffix() -> String {
    ": ".to_string()
}
fn default_quit_message() -> String {
    "irctabs".to_string()
}
fn default_part_message() -> String {
    "Leaving".to_string()
}
fn default_version_string() -> String {
    "irctabs - Rust IRC client".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_status_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "irc.libera.chat");
        assert_eq!(config.server.port, 6697);
        assert!(!config.server.nickname.is_empty());
        assert_eq!(config.ui.max_scrollback, 0);
        assert!(config.behavior.auto_rejoin_on_kick);
        assert_eq!(config.behavior.rejoin_delay_secs, 2);
        assert_eq!(config.behavior.completion_suffix, ": ");
        assert_eq!(config.logging.status_level, "warn");
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r##"
            [server]
            host = "irc.example.net"
            nickname = "ferris"
            channels = ["#rust"]

            [behavior]
            rejoin_delay_secs = 5
            refresh_names = false
            "##,
        )
        .unwrap();
        assert_eq!(config.server.host, "irc.example.net");
        assert_eq!(config.server.nickname, "ferris");
        assert_eq!(config.server.channels, vec!["#rust"]);
        assert!(config.server.tls);
        assert_eq!(config.behavior.rejoin_delay_secs, 5);
        assert!(!config.behavior.refresh_names);
        assert_eq!(config.behavior.quit_message, "irctabs");
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.server.nickname, config.server.nickname);
        assert_eq!(back.ui.render_delay_ms, config.ui.render_delay_ms);
    }

    #[test]
    fn test_log_file_override() {
        let logging = LoggingConfig {
            file: Some(PathBuf::from("/tmp/x.log")),
            ..Default::default()
        };
        assert_eq!(logging.file_path(), PathBuf::from("/tmp/x.log"));
        assert!(LoggingConfig::default()
            .file_path()
            .ends_with("irctabs/irctabs.log"));
    }
}
