//! CPU counter sources.
//!
//! [`SysinfoCpu`] works everywhere and reports the total only.  On Windows,
//! [`SystemTimesCpu`] reads `GetSystemTimes` deltas and adds the
//! user / kernel / idle split.

use runcat_core::{CpuBreakdown, CpuSource, Result, RunCatError, UtilizationSample};
use sysinfo::System;

/// Cross-platform counter backed by `sysinfo`.
pub struct SysinfoCpu {
    sys: System,
}

impl SysinfoCpu {
    /// Open the counter.  Fails if the OS exposes no CPUs to sample.
    pub fn new() -> Result<Self> {
        let mut sys = System::new();
        // The first reading has no baseline and is discarded.
        sys.refresh_cpu_usage();
        if sys.cpus().is_empty() {
            return Err(RunCatError::CounterUnavailable(
                "sysinfo reports no CPUs".into(),
            ));
        }
        Ok(Self { sys })
    }
}

impl CpuSource for SysinfoCpu {
    fn read(&mut self) -> Result<UtilizationSample> {
        self.sys.refresh_cpu_usage();
        Ok(UtilizationSample {
            total:     self.sys.global_cpu_usage(),
            breakdown: None,
        })
    }
}

/// Convert `GetSystemTimes`-style deltas into a sample.
///
/// `kernel` includes `idle`, as the Win32 API reports it.  Returns `None`
/// when no time has elapsed.
pub fn sample_from_deltas(idle: u64, kernel: u64, user: u64) -> Option<UtilizationSample> {
    let total = kernel + user;
    if total == 0 {
        return None;
    }
    let pct = |v: u64| (v as f64 / total as f64 * 100.0) as f32;
    let busy = total.saturating_sub(idle);

    Some(UtilizationSample {
        total: pct(busy),
        breakdown: Some(CpuBreakdown {
            user:   pct(user),
            kernel: pct(kernel.saturating_sub(idle)),
            idle:   pct(idle),
        }),
    })
}

/// Choose the best counter for this platform.
pub fn default_source() -> Result<Box<dyn CpuSource>> {
    #[cfg(windows)]
    {
        match SystemTimesCpu::new() {
            Ok(source) => return Ok(Box::new(source)),
            Err(e) => tracing::warn!("GetSystemTimes unavailable ({e}); using sysinfo"),
        }
    }
    Ok(Box::new(SysinfoCpu::new()?))
}

#[cfg(windows)]
pub use win::SystemTimesCpu;

#[cfg(windows)]
mod win {
    use super::sample_from_deltas;
    use runcat_core::{CpuSource, Result, RunCatError, UtilizationSample};
    use windows::Win32::Foundation::FILETIME;
    use windows::Win32::System::Threading::GetSystemTimes;

    #[derive(Debug, Clone, Copy, Default)]
    struct Times {
        idle:   u64,
        kernel: u64,
        user:   u64,
    }

    /// Windows counter with a user / kernel / idle breakdown.
    pub struct SystemTimesCpu {
        prev: Times,
        last: UtilizationSample,
    }

    impl SystemTimesCpu {
        pub fn new() -> Result<Self> {
            let prev = system_times()?;
            Ok(Self { prev, last: UtilizationSample::default() })
        }
    }

    impl CpuSource for SystemTimesCpu {
        fn read(&mut self) -> Result<UtilizationSample> {
            let now = system_times()?;
            let sample = sample_from_deltas(
                now.idle.saturating_sub(self.prev.idle),
                now.kernel.saturating_sub(self.prev.kernel),
                now.user.saturating_sub(self.prev.user),
            );
            self.prev = now;
            // Two reads within one clock tick repeat the previous value.
            if let Some(sample) = sample {
                self.last = sample;
            }
            Ok(self.last)
        }
    }

    fn filetime_to_u64(ft: &FILETIME) -> u64 {
        ((ft.dwHighDateTime as u64) << 32) | (ft.dwLowDateTime as u64)
    }

    fn system_times() -> Result<Times> {
        let mut idle = FILETIME::default();
        let mut kernel = FILETIME::default();
        let mut user = FILETIME::default();

        // SAFETY: all three pointers refer to live, writable FILETIMEs.
        unsafe { GetSystemTimes(Some(&mut idle), Some(&mut kernel), Some(&mut user)) }
            .map_err(|e| RunCatError::CounterUnavailable(format!("GetSystemTimes: {e}")))?;

        Ok(Times {
            idle:   filetime_to_u64(&idle),
            kernel: filetime_to_u64(&kernel),
            user:   filetime_to_u64(&user),
        })
    }
}
