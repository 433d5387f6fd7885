//! Icon assets for the tray animation.
//!
//! Frames are addressed by [`AssetKey`]; an [`IconSet`] holds every frame of
//! one `(theme, runner)` pair and is only built when all of them load.

pub mod icons;

pub use icons::{DirIconStore, Icon, IconStore, StaticIconStore};

use runcat_core::{AssetKey, ResolvedTheme, Result, Runner};
use std::path::PathBuf;

/// All frames of one runner in one theme.
#[derive(Debug, Clone)]
pub struct IconSet {
    theme:  ResolvedTheme,
    runner: Runner,
    frames: Vec<Icon>,
}

impl IconSet {
    /// Load every frame, failing on the first missing one.
    pub fn load(store: &dyn IconStore, theme: ResolvedTheme, runner: Runner) -> Result<Self> {
        let frames = AssetKey::frames(theme, runner)
            .map(|key| store.icon(key))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(?theme, ?runner, frames = frames.len(), "icon set loaded");
        Ok(Self { theme, runner, frames })
    }

    /// Whether this set was built for `(theme, runner)`.
    pub fn matches(&self, theme: ResolvedTheme, runner: Runner) -> bool {
        self.theme == theme && self.runner == runner
    }

    /// The icon for `key`, if it belongs to this set.
    pub fn get(&self, key: AssetKey) -> Option<&Icon> {
        if !self.matches(key.theme, key.runner) {
            return None;
        }
        self.frames.get(key.frame)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Default icon directory: `icons/` next to the executable.
pub fn default_icon_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("icons")))
        .unwrap_or_else(|| PathBuf::from("icons"))
}
