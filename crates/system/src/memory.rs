use runcat_core::MemoryInfo;
use sysinfo::System;

/// Read physical memory usage.  `sys` is refreshed in place.
pub fn read_memory(sys: &mut System) -> MemoryInfo {
    sys.refresh_memory();
    let total = sys.total_memory();
    let available = sys.available_memory();
    MemoryInfo {
        total,
        used: total.saturating_sub(available),
        available,
    }
}

/// Format a byte count with up to two decimals (e.g. `"7.35 GB"`).
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let number = format!("{value:.2}");
    let number = number.trim_end_matches('0').trim_end_matches('.');
    format!("{number} {}", UNITS[unit])
}
