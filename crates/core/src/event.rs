use crate::state::SystemSnapshot;

/// All messages (events) handled by the tray event loop.
///
/// Sources:
/// - System monitor task   → `Fetched`
/// - Animation timer       → `AnimationTick`
/// - Settings watcher task → `SettingsReloaded`
/// - Ctrl-C / host exit    → `Shutdown`
#[derive(Debug, Clone)]
pub enum Message {
    /// Fresh readings from the background monitor task (one per fetch tick).
    Fetched(SystemSnapshot),
    /// The animation timer fired; advance one frame.
    AnimationTick,
    /// Settings file changed on disk — triggers a live reload.
    SettingsReloaded,
    /// Graceful shutdown requested.
    Shutdown,
}
