pub mod schema;
pub mod watcher;

pub use schema::Settings;
pub use watcher::SettingsWatcher;

use runcat_core::{Result, RunCatError};
use std::path::{Path, PathBuf};

/// Load settings from a TOML file.  Returns `Settings::default()` if the file
/// doesn't exist so a first launch always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Settings file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(Settings::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| RunCatError::Config(format!("cannot read '{}': {e}", path.display())))?;

    toml::from_str(&raw).map_err(|e| RunCatError::Config(format!("TOML parse error: {e}")))
}

/// Write settings to `path`, creating parent directories as needed.
pub fn save(path: impl AsRef<Path>, settings: &Settings) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let raw = toml::to_string_pretty(settings)
        .map_err(|e| RunCatError::Config(format!("TOML serialise error: {e}")))?;

    std::fs::write(path, raw)
        .map_err(|e| RunCatError::Config(format!("cannot write '{}': {e}", path.display())))?;

    tracing::info!("Settings saved to '{}'", path.display());
    Ok(())
}

/// Return the default settings path: `%APPDATA%\runcat` on Windows,
/// `$XDG_CONFIG_HOME/runcat` elsewhere.
pub fn default_path() -> PathBuf {
    let base = if cfg!(windows) {
        std::env::var("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
    } else {
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".config")
            })
    };
    base.join("runcat").join("settings.toml")
}
