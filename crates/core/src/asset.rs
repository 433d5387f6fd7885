use crate::settings::{ResolvedTheme, Runner};

/// Identifies one icon frame: `(theme, runner, frame index)`.
///
/// The key is typed end to end; the only place it becomes a string is
/// [`AssetKey::file_stem`], which asset stores use to locate the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetKey {
    pub theme:  ResolvedTheme,
    pub runner: Runner,
    pub frame:  usize,
}

impl AssetKey {
    pub fn new(theme: ResolvedTheme, runner: Runner, frame: usize) -> Self {
        Self { theme, runner, frame }
    }

    /// Every key of one icon set, in frame order.
    pub fn frames(theme: ResolvedTheme, runner: Runner) -> impl Iterator<Item = AssetKey> {
        (0..runner.frame_count()).map(move |frame| Self::new(theme, runner, frame))
    }

    /// Lower-case resource name, e.g. `"dark_parrot_7"`.
    pub fn file_stem(&self) -> String {
        let theme = match self.theme {
            ResolvedTheme::Light => "light",
            ResolvedTheme::Dark  => "dark",
        };
        let runner = match self.runner {
            Runner::Cat    => "cat",
            Runner::Parrot => "parrot",
            Runner::Horse  => "horse",
        };
        format!("{theme}_{runner}_{}", self.frame)
    }
}
