use runcat_core::{ResolvedTheme, ThemeSource};

/// Reads the OS light/dark preference.
///
/// On Windows this is `SystemUsesLightTheme` under the `Personalize` key;
/// everywhere else, and whenever the value is missing, `Light`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsTheme;

impl ThemeSource for OsTheme {
    fn system_theme(&self) -> ResolvedTheme {
        read()
    }
}

#[cfg(windows)]
fn read() -> ResolvedTheme {
    const PERSONALIZE: &str = r"Software\Microsoft\Windows\CurrentVersion\Themes\Personalize";

    let value = crate::registry::Key::open_read(PERSONALIZE)
        .ok()
        .and_then(|key| key.dword("SystemUsesLightTheme"));
    match value {
        Some(0) => ResolvedTheme::Dark,
        Some(_) => ResolvedTheme::Light,
        None => {
            tracing::debug!("SystemUsesLightTheme not set; assuming light");
            ResolvedTheme::Light
        }
    }
}

#[cfg(not(windows))]
fn read() -> ResolvedTheme {
    ResolvedTheme::Light
}
