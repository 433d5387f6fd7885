//! Launch-at-login registration (`HKCU\...\CurrentVersion\Run`).

use runcat_core::Result;

/// Value name under the `Run` key.
pub const APP_NAME: &str = "RunCat";

#[cfg(windows)]
const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";

/// Whether the app is registered to start at login.
#[cfg(windows)]
pub fn is_enabled() -> bool {
    crate::registry::Key::open_read(RUN_KEY)
        .map(|key| key.has_value(APP_NAME))
        .unwrap_or(false)
}

/// Register or unregister the current executable.
#[cfg(windows)]
pub fn set_enabled(enabled: bool) -> Result<()> {
    let key = crate::registry::Key::open_write(RUN_KEY)?;
    if enabled {
        let exe = std::env::current_exe()?;
        key.set_path(APP_NAME, &exe)
    } else {
        key.delete(APP_NAME)
    }
}

#[cfg(not(windows))]
pub fn is_enabled() -> bool {
    false
}

#[cfg(not(windows))]
pub fn set_enabled(_enabled: bool) -> Result<()> {
    Err(runcat_core::RunCatError::System(
        "launch at login is only supported on Windows".into(),
    ))
}

/// Bring the OS registration in line with the `launch_at_login` setting.
pub fn sync(wanted: Option<bool>) -> Result<()> {
    let Some(wanted) = wanted else {
        return Ok(());
    };
    if is_enabled() == wanted {
        return Ok(());
    }
    set_enabled(wanted)?;
    tracing::info!("Launch at login {}", if wanted { "enabled" } else { "disabled" });
    Ok(())
}
