//! Fetch / animate coordination.
//!
//! The host drives two independent timers and forwards them here:
//!
//! - fetch tick (every `refresh_rate`) → [`Engine::on_fetch_tick`]
//! - animation tick (every `interval_ms`) → [`Engine::on_animation_tick`]
//!
//! When a fetch tick returns [`FetchOutcome::Reconfigure`], the host must stop
//! the animation timer and start it again with the new period.  The phase is
//! restarted rather than retuned, so the new speed shows up immediately.

use crate::asset::AssetKey;
use crate::rate::RateMapper;
use crate::sampler::{CpuBreakdown, SampleAggregator, UtilizationSample};
use crate::settings::{ReconfigurePolicy, ResolvedTheme, Runner, SpeedConfig};
use std::time::Duration;
use tracing::debug;

/// Animation period used until the first fetch tick has been processed.
pub const DEFAULT_INTERVAL_MS: u32 = 200;

/// Frame position and period of the running animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationState {
    pub frame_count:   usize,
    pub current_frame: usize,
    pub interval_ms:   u32,
}

impl AnimationState {
    pub fn new(frame_count: usize) -> Self {
        Self {
            frame_count: frame_count.max(1),
            current_frame: 0,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }

    /// Return the frame to show and step to the next one.
    ///
    /// A frame index left over from a runner with more frames restarts at 0.
    pub fn advance(&mut self) -> usize {
        if self.current_frame >= self.frame_count {
            self.current_frame = 0;
        }
        let frame = self.current_frame;
        self.current_frame = (frame + 1) % self.frame_count;
        frame
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.interval_ms))
    }
}

/// Result of one fetch tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Sample stored; the animation keeps its current period.
    Accumulating,
    /// The animation timer must be restarted with this period.
    Reconfigure { interval_ms: u32 },
}

/// What the tray should show after an animation tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    pub key:     AssetKey,
    pub tooltip: String,
}

/// Owns the sampler, the rate mapper and the animation state.
#[derive(Debug, Clone)]
pub struct Engine {
    aggregator:    SampleAggregator,
    mapper:        RateMapper,
    animation:     AnimationState,
    runner:        Runner,
    theme:         ResolvedTheme,
    policy:        ReconfigurePolicy,
    fetch_counter: usize,
}

impl Engine {
    pub fn new(
        config: SpeedConfig,
        runner: Runner,
        theme:  ResolvedTheme,
        policy: ReconfigurePolicy,
    ) -> Self {
        let aggregator = SampleAggregator::default();
        // Start full so the very first fetch tick sets a real interval.
        let fetch_counter = aggregator.capacity();
        Self {
            aggregator,
            mapper: RateMapper::new(config),
            animation: AnimationState::new(runner.frame_count()),
            runner,
            theme,
            policy,
            fetch_counter,
        }
    }

    /// Ingest one reading and decide whether the animation period changes.
    pub fn on_fetch_tick(&mut self, sample: UtilizationSample) -> FetchOutcome {
        self.aggregator.ingest_sample(sample);
        self.fetch_counter += 1;

        if self.policy == ReconfigurePolicy::Batched
            && self.fetch_counter < self.aggregator.capacity()
        {
            return FetchOutcome::Accumulating;
        }
        self.fetch_counter = 0;

        let average = self.aggregator.current_average();
        let interval_ms = self.mapper.compute_interval(average);
        self.animation.interval_ms = interval_ms;
        debug!(average, interval_ms, "animation interval recomputed");

        FetchOutcome::Reconfigure { interval_ms }
    }

    /// Advance one frame and report what to draw.
    pub fn on_animation_tick(&mut self) -> AnimationFrame {
        let frame = self.animation.advance();
        AnimationFrame {
            key:     AssetKey::new(self.theme, self.runner, frame),
            tooltip: self.current_status_text(),
        }
    }

    /// Tooltip text, e.g. `"CPU: 12.5%"`.
    pub fn current_status_text(&self) -> String {
        format!("CPU: {:.1}%", self.aggregator.current_average())
    }

    /// Swap in new speed settings.  The running interval is kept until the
    /// next reconfiguring fetch tick.
    pub fn configure(&mut self, config: SpeedConfig) {
        self.mapper.configure(config);
    }

    pub fn set_policy(&mut self, policy: ReconfigurePolicy) {
        self.policy = policy;
    }

    pub fn set_runner(&mut self, runner: Runner) {
        self.runner = runner;
        self.animation.frame_count = runner.frame_count();
    }

    pub fn set_theme(&mut self, theme: ResolvedTheme) {
        self.theme = theme;
    }

    pub fn average(&self) -> f32 {
        self.aggregator.current_average()
    }

    pub fn breakdown(&self) -> Option<CpuBreakdown> {
        self.aggregator.breakdown_average()
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn runner(&self) -> Runner {
        self.runner
    }

    pub fn theme(&self) -> ResolvedTheme {
        self.theme
    }

    pub fn speed_config(&self) -> &SpeedConfig {
        self.mapper.config()
    }
}
