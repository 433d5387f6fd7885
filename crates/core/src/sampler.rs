use std::collections::VecDeque;

/// Number of samples kept in the rolling window.
pub const WINDOW_CAPACITY: usize = 5;

/// Clamp a raw percentage into `[0, 100]`.  NaN counts as idle.
///
/// The OS counter occasionally reports more than 100 %.
pub fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// User / kernel / idle split of one CPU reading (each `0.0 – 100.0`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CpuBreakdown {
    pub user:   f32,
    pub kernel: f32,
    pub idle:   f32,
}

impl CpuBreakdown {
    fn clamped(self) -> Self {
        Self {
            user:   clamp_percent(self.user),
            kernel: clamp_percent(self.kernel),
            idle:   clamp_percent(self.idle),
        }
    }
}

/// One CPU reading taken on a fetch tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UtilizationSample {
    /// Overall utilisation (0.0 – 100.0).
    pub total: f32,
    /// Per-channel split, when the counter source provides one.
    pub breakdown: Option<CpuBreakdown>,
}

impl UtilizationSample {
    /// A total-only sample, clamped.
    pub fn total(raw: f32) -> Self {
        Self { total: clamp_percent(raw), breakdown: None }
    }

    /// A sample with a per-channel breakdown, every field clamped.
    pub fn with_breakdown(raw: f32, breakdown: CpuBreakdown) -> Self {
        Self {
            total:     clamp_percent(raw),
            breakdown: Some(breakdown.clamped()),
        }
    }

    fn clamped(self) -> Self {
        Self {
            total:     clamp_percent(self.total),
            breakdown: self.breakdown.map(CpuBreakdown::clamped),
        }
    }
}

/// Rolling window of recent CPU samples, smoothing out single-tick spikes.
///
/// All channels live in the same window, so the total and the per-channel
/// averages always cover the same instants.
#[derive(Debug, Clone)]
pub struct SampleAggregator {
    samples:  VecDeque<UtilizationSample>,
    capacity: usize,
}

impl Default for SampleAggregator {
    fn default() -> Self {
        Self::new(WINDOW_CAPACITY)
    }
}

impl SampleAggregator {
    /// `capacity` is raised to 1 if zero.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a total-only reading, evicting the oldest if at capacity.
    pub fn ingest(&mut self, raw: f32) {
        self.ingest_sample(UtilizationSample::total(raw));
    }

    /// Push a full reading, evicting the oldest if at capacity.
    pub fn ingest_sample(&mut self, sample: UtilizationSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample.clamped());
    }

    /// Mean total utilisation over the window; `0.0` before the first sample.
    pub fn current_average(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.samples.iter().map(|s| s.total).sum();
        clamp_percent(sum / self.samples.len() as f32)
    }

    /// Per-channel means over the samples that carried a breakdown.
    pub fn breakdown_average(&self) -> Option<CpuBreakdown> {
        let (count, sum) = self
            .samples
            .iter()
            .filter_map(|s| s.breakdown)
            .fold((0usize, CpuBreakdown::default()), |(n, acc), b| {
                (
                    n + 1,
                    CpuBreakdown {
                        user:   acc.user + b.user,
                        kernel: acc.kernel + b.kernel,
                        idle:   acc.idle + b.idle,
                    },
                )
            });

        if count == 0 {
            return None;
        }
        let n = count as f32;
        Some(CpuBreakdown {
            user:   sum.user / n,
            kernel: sum.kernel / n,
            idle:   sum.idle / n,
        }
        .clamped())
    }

    /// Samples currently held, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = &UtilizationSample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(agg: &SampleAggregator) -> Vec<f32> {
        agg.samples().map(|s| s.total).collect()
    }

    #[test]
    fn empty_window_averages_to_zero() {
        assert_eq!(SampleAggregator::default().current_average(), 0.0);
    }

    #[test]
    fn out_of_range_readings_are_clamped() {
        let mut agg = SampleAggregator::default();
        for raw in [-50.0, 180.0, f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            agg.ingest(raw);
            let avg = agg.current_average();
            assert!((0.0..=100.0).contains(&avg), "average {avg} out of range");
        }
        assert_eq!(totals(&agg), vec![0.0, 100.0, 0.0, 100.0, 0.0]);
    }

    #[test]
    fn window_averages_last_five() {
        let mut agg = SampleAggregator::default();
        for raw in [10.0, 20.0, 30.0, 40.0, 50.0] {
            agg.ingest(raw);
        }
        assert_eq!(agg.current_average(), 30.0);

        agg.ingest(60.0);
        assert_eq!(totals(&agg), vec![20.0, 30.0, 40.0, 50.0, 60.0]);
        assert_eq!(agg.current_average(), 40.0);
    }

    #[test]
    fn eviction_is_fifo_for_long_runs() {
        let mut agg = SampleAggregator::new(3);
        for i in 0..10 {
            agg.ingest(i as f32);
        }
        assert_eq!(agg.len(), 3);
        assert_eq!(totals(&agg), vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut agg = SampleAggregator::new(0);
        agg.ingest(10.0);
        agg.ingest(20.0);
        assert_eq!(agg.capacity(), 1);
        assert_eq!(agg.current_average(), 20.0);
    }

    #[test]
    fn breakdown_channels_are_paired_with_totals() {
        let mut agg = SampleAggregator::new(2);
        agg.ingest_sample(UtilizationSample::with_breakdown(
            30.0,
            CpuBreakdown { user: 20.0, kernel: 10.0, idle: 70.0 },
        ));
        agg.ingest_sample(UtilizationSample::with_breakdown(
            50.0,
            CpuBreakdown { user: 40.0, kernel: 10.0, idle: 50.0 },
        ));
        // Evicts the first sample for every channel at once.
        agg.ingest_sample(UtilizationSample::with_breakdown(
            70.0,
            CpuBreakdown { user: 60.0, kernel: 150.0, idle: 30.0 },
        ));

        assert_eq!(agg.current_average(), 60.0);
        let b = agg.breakdown_average().unwrap();
        assert_eq!(b.user, 50.0);
        assert_eq!(b.kernel, 55.0);
        assert_eq!(b.idle, 40.0);
    }

    #[test]
    fn breakdown_absent_for_total_only_sources() {
        let mut agg = SampleAggregator::default();
        agg.ingest(42.0);
        assert!(agg.breakdown_average().is_none());
    }
}
