use runcat_core::{AssetKey, Result};
use runcat_theme::Icon;
use tracing::{debug, info, trace};

/// The notification-area icon the app draws into.
///
/// Implementations own the native handle; the event loop only pushes state.
pub trait TrayHost {
    /// Show `icon` as the current animation frame.
    fn set_icon(&mut self, icon: &Icon) -> Result<()>;

    /// Hover text, e.g. `"CPU: 12.5%"`.
    fn set_tooltip(&mut self, text: &str) -> Result<()>;

    /// Multi-line CPU / memory / storage report shown in the menu.
    fn set_system_info(&mut self, text: &str) -> Result<()>;

    /// Remove the icon before exit.
    fn hide(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Host without a native tray: reports state changes through `tracing`.
#[derive(Debug, Default)]
pub struct HeadlessTray {
    icon:    Option<AssetKey>,
    tooltip: String,
    info:    String,
}

impl HeadlessTray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn icon(&self) -> Option<AssetKey> {
        self.icon
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn system_info(&self) -> &str {
        &self.info
    }
}

impl TrayHost for HeadlessTray {
    fn set_icon(&mut self, icon: &Icon) -> Result<()> {
        trace!(frame = %icon.key.file_stem(), "icon");
        self.icon = Some(icon.key);
        Ok(())
    }

    fn set_tooltip(&mut self, text: &str) -> Result<()> {
        if self.tooltip != text {
            debug!("{text}");
            self.tooltip = text.to_string();
        }
        Ok(())
    }

    fn set_system_info(&mut self, text: &str) -> Result<()> {
        if self.info != text {
            info!("\n{text}");
            self.info = text.to_string();
        }
        Ok(())
    }

    fn hide(&mut self) -> Result<()> {
        self.icon = None;
        Ok(())
    }
}
