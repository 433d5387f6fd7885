//! CPU utilisation → animation frame interval.
//!
//! Higher load means a shorter interval (faster runner), saturating at both
//! ends:
//!
//! ```text
//! speed    = max(1, (cpu / 5) * fps_rate)
//! interval = 500 ms / speed            // 25 ms (40 fps) ..= 500 ms (2 fps)
//! ```
//!
//! The legacy speed-limit floor replaces the FPS cap when selected:
//!
//! ```text
//! naive    = 500 ms / clamp(cpu / 5, 1, 20)
//! interval = max(floor, naive)
//! ```

use crate::sampler::clamp_percent;
use crate::settings::{Choice, SpeedConfig, SpeedLimit};
use tracing::{debug, warn};

/// Frame interval of the slowest animation, at or below 5 % CPU.
pub const BASE_INTERVAL_MS: f32 = 500.0;

/// Upper bound of `cpu / 5` in the legacy curve.
const MAX_SPEED: f32 = 20.0;

/// Maps smoothed CPU utilisation to an animation interval.
#[derive(Debug, Clone, Default)]
pub struct RateMapper {
    config: SpeedConfig,
}

impl RateMapper {
    pub fn new(config: SpeedConfig) -> Self {
        let mut mapper = Self::default();
        mapper.configure(config);
        mapper
    }

    /// Replace the mapping parameters.  Takes effect on the next
    /// [`RateMapper::compute_interval`] call.
    pub fn configure(&mut self, config: SpeedConfig) {
        if config.speed_limit != SpeedLimit::Default {
            warn!(
                "Speed limit '{}' is deprecated and overrides the FPS max limit '{}'",
                config.speed_limit.label(),
                config.fps_max_limit.label()
            );
        }
        debug!(?config, "rate mapper configured");
        self.config = config;
    }

    pub fn config(&self) -> &SpeedConfig {
        &self.config
    }

    /// Frame interval in milliseconds for `utilization` (percent).  Always ≥ 1.
    pub fn compute_interval(&self, utilization: f32) -> u32 {
        let cpu = clamp_percent(utilization);

        let interval = match floor_ms(self.config.speed_limit) {
            Some(floor) => {
                let naive = BASE_INTERVAL_MS / (cpu / 5.0).clamp(1.0, MAX_SPEED);
                naive.max(floor)
            }
            None => {
                let speed = ((cpu / 5.0) * self.config.fps_max_limit.rate()).max(1.0);
                BASE_INTERVAL_MS / speed
            }
        };

        (interval as u32).max(1)
    }
}

/// Interval the unthrottled curve produces at the limit's CPU percentage.
fn floor_ms(limit: SpeedLimit) -> Option<f32> {
    limit
        .cpu_percent()
        .map(|pct| BASE_INTERVAL_MS / (pct / 5.0).clamp(1.0, MAX_SPEED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::FpsMaxLimit;

    fn mapper(fps: FpsMaxLimit) -> RateMapper {
        RateMapper::new(SpeedConfig { fps_max_limit: fps, ..SpeedConfig::default() })
    }

    fn floored(limit: SpeedLimit) -> RateMapper {
        RateMapper::new(SpeedConfig { speed_limit: limit, ..SpeedConfig::default() })
    }

    #[test]
    fn idle_cpu_gives_base_interval() {
        for fps in FpsMaxLimit::ALL {
            assert_eq!(mapper(*fps).compute_interval(0.0), 500);
            assert_eq!(mapper(*fps).compute_interval(5.0), 500);
        }
    }

    #[test]
    fn full_cpu_saturates_per_fps_limit() {
        assert_eq!(mapper(FpsMaxLimit::Fps40).compute_interval(100.0), 25);
        assert_eq!(mapper(FpsMaxLimit::Fps30).compute_interval(100.0), 33);
        assert_eq!(mapper(FpsMaxLimit::Fps20).compute_interval(100.0), 50);
        assert_eq!(mapper(FpsMaxLimit::Fps10).compute_interval(100.0), 100);
    }

    #[test]
    fn thirty_percent_runs_at_eighty_three_ms() {
        assert_eq!(mapper(FpsMaxLimit::Fps40).compute_interval(30.0), 83);
    }

    #[test]
    fn out_of_domain_input_is_clamped() {
        let m = mapper(FpsMaxLimit::Fps40);
        assert_eq!(m.compute_interval(250.0), 25);
        assert_eq!(m.compute_interval(-3.0), 500);
        assert_eq!(m.compute_interval(f32::NAN), 500);
    }

    #[test]
    fn interval_never_increases_with_load() {
        for fps in FpsMaxLimit::ALL {
            let m = mapper(*fps);
            let mut prev = u32::MAX;
            for step in 0..=1000 {
                let interval = m.compute_interval(step as f32 / 10.0);
                assert!(interval >= 1);
                assert!(interval <= prev, "{fps}: {interval} > {prev} at {step}");
                prev = interval;
            }
        }
    }

    #[test]
    fn lower_fps_cap_never_speeds_up() {
        for step in 0..=100 {
            let cpu = step as f32;
            let intervals: Vec<u32> = FpsMaxLimit::ALL
                .iter()
                .map(|fps| mapper(*fps).compute_interval(cpu))
                .collect();
            assert!(intervals.windows(2).all(|w| w[0] <= w[1]), "{cpu}: {intervals:?}");
        }
    }

    #[test]
    fn speed_limit_floors_the_interval() {
        let m = floored(SpeedLimit::Cpu10);
        assert_eq!(m.compute_interval(100.0), 250);
        assert_eq!(m.compute_interval(0.0), 500);

        assert_eq!(floored(SpeedLimit::Cpu20).compute_interval(100.0), 125);
        assert_eq!(floored(SpeedLimit::Cpu30).compute_interval(100.0), 83);
        assert_eq!(floored(SpeedLimit::Cpu40).compute_interval(100.0), 62);
    }

    #[test]
    fn speed_limit_ignores_fps_cap() {
        let m = RateMapper::new(SpeedConfig {
            fps_max_limit: FpsMaxLimit::Fps10,
            speed_limit:   SpeedLimit::Cpu40,
            ..SpeedConfig::default()
        });
        assert_eq!(m.compute_interval(100.0), 62);
    }

    #[test]
    fn configure_applies_to_next_computation() {
        let mut m = mapper(FpsMaxLimit::Fps40);
        assert_eq!(m.compute_interval(100.0), 25);
        m.configure(SpeedConfig { fps_max_limit: FpsMaxLimit::Fps10, ..SpeedConfig::default() });
        assert_eq!(m.compute_interval(100.0), 100);
    }
}
