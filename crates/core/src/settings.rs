//! User-selectable settings: runner, theme, speed limits and refresh rate.
//!
//! Every choice round-trips through its display label (`"40fps"`, `"1 sec"`,
//! `"CPU 10%"` …).  Unknown labels never fail: they fall back to the
//! documented default and log a warning, so a hand-edited or stale settings
//! file can always be loaded.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::warn;

/// A closed set of user choices identified by a display label.
pub trait Choice: Copy + Default + PartialEq + 'static {
    /// Human-readable name of the setting, used in log messages.
    const KIND: &'static str;
    /// Every variant, in menu order.
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    /// Case-insensitive label lookup.
    fn parse_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(value))
    }

    /// Like [`Choice::parse_label`], but unknown input yields the default.
    fn parse_or_default(value: &str) -> Self {
        Self::parse_label(value).unwrap_or_else(|| {
            let fallback = Self::default();
            warn!(
                "Unrecognised {} '{value}'; falling back to '{}'",
                Self::KIND,
                fallback.label()
            );
            fallback
        })
    }
}

/// Serialise a [`Choice`] as its label and deserialise leniently.
macro_rules! label_serde {
    ($ty:ty) => {
        impl From<String> for $ty {
            fn from(value: String) -> Self {
                <$ty as Choice>::parse_or_default(&value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.label().to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

// ── Runner ────────────────────────────────────────────────────────────────────

/// The animated character shown in the tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Runner {
    #[default]
    Cat,
    Parrot,
    Horse,
}

impl Runner {
    /// Number of animation frames shipped for this runner.
    pub const fn frame_count(self) -> usize {
        match self {
            Runner::Cat    => 5,
            Runner::Parrot => 10,
            Runner::Horse  => 14,
        }
    }
}

impl Choice for Runner {
    const KIND: &'static str = "runner";
    const ALL: &'static [Self] = &[Runner::Cat, Runner::Parrot, Runner::Horse];

    fn label(self) -> &'static str {
        match self {
            Runner::Cat    => "Cat",
            Runner::Parrot => "Parrot",
            Runner::Horse  => "Horse",
        }
    }
}

label_serde!(Runner);

// ── Theme ─────────────────────────────────────────────────────────────────────

/// Icon colour scheme chosen by the user.  `System` follows the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

/// A concrete colour scheme, after `Theme::System` has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResolvedTheme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Resolve against the current OS preference.
    pub fn resolve(self, system: ResolvedTheme) -> ResolvedTheme {
        match self {
            Theme::System => system,
            Theme::Light  => ResolvedTheme::Light,
            Theme::Dark   => ResolvedTheme::Dark,
        }
    }
}

impl Choice for Theme {
    const KIND: &'static str = "theme";
    const ALL: &'static [Self] = &[Theme::System, Theme::Light, Theme::Dark];

    fn label(self) -> &'static str {
        match self {
            Theme::System => "System",
            Theme::Light  => "Light",
            Theme::Dark   => "Dark",
        }
    }
}

label_serde!(Theme);

// ── FPS max limit ─────────────────────────────────────────────────────────────

/// Ceiling on animation speed, expressed as a multiplier on the speed curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FpsMaxLimit {
    #[default]
    Fps40,
    Fps30,
    Fps20,
    Fps10,
}

impl FpsMaxLimit {
    /// Multiplier applied to the CPU-derived speed factor.
    pub const fn rate(self) -> f32 {
        match self {
            FpsMaxLimit::Fps40 => 1.0,
            FpsMaxLimit::Fps30 => 0.75,
            FpsMaxLimit::Fps20 => 0.5,
            FpsMaxLimit::Fps10 => 0.25,
        }
    }
}

impl Choice for FpsMaxLimit {
    const KIND: &'static str = "FPS max limit";
    const ALL: &'static [Self] = &[
        FpsMaxLimit::Fps40,
        FpsMaxLimit::Fps30,
        FpsMaxLimit::Fps20,
        FpsMaxLimit::Fps10,
    ];

    fn label(self) -> &'static str {
        match self {
            FpsMaxLimit::Fps40 => "40fps",
            FpsMaxLimit::Fps30 => "30fps",
            FpsMaxLimit::Fps20 => "20fps",
            FpsMaxLimit::Fps10 => "10fps",
        }
    }
}

label_serde!(FpsMaxLimit);

// ── Refresh rate ──────────────────────────────────────────────────────────────

/// How often the CPU counter is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RefreshRate {
    #[default]
    Sec1,
    Sec2,
    Sec3,
    Sec4,
    Sec5,
    Sec10,
}

impl RefreshRate {
    pub const fn seconds(self) -> u64 {
        match self {
            RefreshRate::Sec1  => 1,
            RefreshRate::Sec2  => 2,
            RefreshRate::Sec3  => 3,
            RefreshRate::Sec4  => 4,
            RefreshRate::Sec5  => 5,
            RefreshRate::Sec10 => 10,
        }
    }

    pub const fn period(self) -> Duration {
        Duration::from_secs(self.seconds())
    }
}

impl Choice for RefreshRate {
    const KIND: &'static str = "refresh rate";
    const ALL: &'static [Self] = &[
        RefreshRate::Sec1,
        RefreshRate::Sec2,
        RefreshRate::Sec3,
        RefreshRate::Sec4,
        RefreshRate::Sec5,
        RefreshRate::Sec10,
    ];

    fn label(self) -> &'static str {
        match self {
            RefreshRate::Sec1  => "1 sec",
            RefreshRate::Sec2  => "2 secs",
            RefreshRate::Sec3  => "3 secs",
            RefreshRate::Sec4  => "4 secs",
            RefreshRate::Sec5  => "5 secs",
            RefreshRate::Sec10 => "10 secs",
        }
    }
}

label_serde!(RefreshRate);

// ── Speed limit (deprecated) ──────────────────────────────────────────────────

/// Legacy "runner speed limit": the runner never goes faster than it would at
/// the labelled CPU load.  Superseded by [`FpsMaxLimit`]; when set to anything
/// but `Default` it replaces the FPS cap instead of combining with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpeedLimit {
    #[default]
    Default,
    Cpu10,
    Cpu20,
    Cpu30,
    Cpu40,
}

impl SpeedLimit {
    /// CPU percentage at which the speed curve is cut off, if any.
    pub const fn cpu_percent(self) -> Option<f32> {
        match self {
            SpeedLimit::Default => None,
            SpeedLimit::Cpu10   => Some(10.0),
            SpeedLimit::Cpu20   => Some(20.0),
            SpeedLimit::Cpu30   => Some(30.0),
            SpeedLimit::Cpu40   => Some(40.0),
        }
    }
}

impl Choice for SpeedLimit {
    const KIND: &'static str = "speed limit";
    const ALL: &'static [Self] = &[
        SpeedLimit::Default,
        SpeedLimit::Cpu10,
        SpeedLimit::Cpu20,
        SpeedLimit::Cpu30,
        SpeedLimit::Cpu40,
    ];

    fn label(self) -> &'static str {
        match self {
            SpeedLimit::Default => "Default",
            SpeedLimit::Cpu10   => "CPU 10%",
            SpeedLimit::Cpu20   => "CPU 20%",
            SpeedLimit::Cpu30   => "CPU 30%",
            SpeedLimit::Cpu40   => "CPU 40%",
        }
    }
}

label_serde!(SpeedLimit);

// ── Reconfigure policy ────────────────────────────────────────────────────────

/// When a fetch tick recomputes the animation interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReconfigurePolicy {
    /// Once every time the rolling window has been refilled.
    #[default]
    Batched,
    /// On every fetch tick.
    Continuous,
}

impl Choice for ReconfigurePolicy {
    const KIND: &'static str = "reconfigure policy";
    const ALL: &'static [Self] = &[ReconfigurePolicy::Batched, ReconfigurePolicy::Continuous];

    fn label(self) -> &'static str {
        match self {
            ReconfigurePolicy::Batched    => "batched",
            ReconfigurePolicy::Continuous => "continuous",
        }
    }
}

label_serde!(ReconfigurePolicy);

// ── SpeedConfig ───────────────────────────────────────────────────────────────

/// Parameters of the CPU → animation-interval mapping.
///
/// Swapped as a whole through [`crate::RateMapper::configure`]; never
/// mutated field by field while in use.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpeedConfig {
    pub fps_max_limit: FpsMaxLimit,
    pub speed_limit:   SpeedLimit,
    pub refresh_rate:  RefreshRate,
}
