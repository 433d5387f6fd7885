use crate::error::Result;
use crate::sampler::UtilizationSample;
use crate::settings::ResolvedTheme;

/// A CPU performance counter.
///
/// Implementations may return raw values above 100 %; the aggregator clamps.
pub trait CpuSource: Send {
    /// Take one reading.  Called once per fetch tick.
    fn read(&mut self) -> Result<UtilizationSample>;
}

/// The OS light/dark preference.
pub trait ThemeSource: Send + Sync {
    fn system_theme(&self) -> ResolvedTheme;
}

/// A fixed OS preference, for hosts without theme support and for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTheme(pub ResolvedTheme);

impl ThemeSource for FixedTheme {
    fn system_theme(&self) -> ResolvedTheme {
        self.0
    }
}
