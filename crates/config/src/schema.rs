use runcat_core::{
    FpsMaxLimit, ReconfigurePolicy, RefreshRate, Runner, SpeedConfig, SpeedLimit, Theme,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persisted user settings, parsed from `settings.toml`.
///
/// Every field is optional in the file; unknown values fall back to their
/// defaults instead of rejecting the whole file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Animated character (`"Cat"`, `"Parrot"`, `"Horse"`).
    pub runner: Runner,
    /// Icon colour scheme (`"System"`, `"Light"`, `"Dark"`).
    pub theme: Theme,
    /// Animation speed ceiling (`"40fps"` … `"10fps"`).
    pub fps_max_limit: FpsMaxLimit,
    /// CPU sampling cadence (`"1 sec"` … `"10 secs"`).
    pub refresh_rate: RefreshRate,
    /// Deprecated minimum-interval floor (`"Default"`, `"CPU 10%"` … `"CPU 40%"`).
    pub speed_limit: SpeedLimit,
    /// `"batched"` recomputes the speed once per full window, `"continuous"`
    /// on every sample.
    pub reconfigure: ReconfigurePolicy,
    /// Register / unregister the app to start at login.  Unset leaves the
    /// OS setting alone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_at_login: Option<bool>,
    /// Directory holding `<theme>_<runner>_<frame>.ico` files.  Unset uses
    /// `icons/` next to the executable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_dir: Option<PathBuf>,
}

impl Settings {
    /// The subset that parameterises the rate mapper.
    pub fn speed_config(&self) -> SpeedConfig {
        SpeedConfig {
            fps_max_limit: self.fps_max_limit,
            speed_limit:   self.speed_limit,
            refresh_rate:  self.refresh_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.fps_max_limit, FpsMaxLimit::Fps40);
        assert_eq!(settings.refresh_rate, RefreshRate::Sec1);
    }

    #[test]
    fn labels_are_read_from_toml() {
        let settings: Settings = toml::from_str(
            r#"
            runner = "Parrot"
            theme = "dark"
            fps_max_limit = "20fps"
            refresh_rate = "3 secs"
            reconfigure = "continuous"
            launch_at_login = true
            "#,
        )
        .unwrap();

        assert_eq!(settings.runner, Runner::Parrot);
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.fps_max_limit, FpsMaxLimit::Fps20);
        assert_eq!(settings.refresh_rate, RefreshRate::Sec3);
        assert_eq!(settings.reconfigure, ReconfigurePolicy::Continuous);
        assert_eq!(settings.launch_at_login, Some(true));
    }

    #[test]
    fn unknown_values_fall_back_per_field() {
        let settings: Settings = toml::from_str(
            r#"
            runner = "Dog"
            fps_max_limit = "120fps"
            speed_limit = "CPU 30%"
            "#,
        )
        .unwrap();

        assert_eq!(settings.runner, Runner::Cat);
        assert_eq!(settings.fps_max_limit, FpsMaxLimit::Fps40);
        assert_eq!(settings.speed_limit, SpeedLimit::Cpu30);
    }

    #[test]
    fn serialises_with_labels() {
        let settings = Settings { fps_max_limit: FpsMaxLimit::Fps10, ..Settings::default() };
        let raw = toml::to_string(&settings).unwrap();
        assert!(raw.contains(r#"fps_max_limit = "10fps""#), "{raw}");
        assert!(!raw.contains("icon_dir"));
    }
}
