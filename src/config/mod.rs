pub mod model;
pub mod nickname;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub use model::AppConfig;

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("irctabs")
        .join("config.toml")
}

/// Load the config file, falling back to defaults when it does not exist.
pub fn load_config() -> Result<AppConfig> {
    load_from(&config_path())
}

pub fn load_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("irctabs-does-not-exist.toml");
        let config = load_from(&path).unwrap();
        assert_eq!(config.behavior.rejoin_delay_secs, 2);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("irctabs-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[server\nport = ").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        std::fs::remove_file(&path).unwrap();
    }
}
