use crate::sampler::UtilizationSample;

/// Physical memory usage, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemoryInfo {
    pub total:     u64,
    pub used:      u64,
    pub available: u64,
}

impl MemoryInfo {
    /// Memory load as a whole percentage (0 – 100).
    #[must_use]
    pub fn load_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.used as f64 / self.total as f64) * 100.0).round().min(100.0) as u8
    }
}

/// Usage of one mounted drive, in bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageInfo {
    /// Display name, e.g. `"C Drive"` or `"/home"`.
    pub name:      String,
    pub total:     u64,
    pub used:      u64,
    pub available: u64,
}

impl StorageInfo {
    /// Used space as a percentage (0.0 – 100.0).
    #[must_use]
    pub fn used_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.used as f64 / self.total as f64 * 100.0
    }
}

/// Everything read from the OS on one fetch tick.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    pub cpu:     UtilizationSample,
    pub memory:  MemoryInfo,
    pub storage: Vec<StorageInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_load_rounds() {
        let mem = MemoryInfo { total: 3, used: 2, available: 1 };
        assert_eq!(mem.load_percent(), 67);
        assert_eq!(MemoryInfo::default().load_percent(), 0);
    }

    #[test]
    fn storage_percent_handles_empty_drive() {
        assert_eq!(StorageInfo::default().used_percent(), 0.0);
        let d = StorageInfo { name: "C Drive".into(), total: 200, used: 50, available: 150 };
        assert_eq!(d.used_percent(), 25.0);
    }
}
