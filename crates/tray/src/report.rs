use runcat_core::{CpuBreakdown, MemoryInfo, StorageInfo};
use runcat_system::memory::format_bytes;

/// Build the multi-line system report shown in the tray menu.
pub fn system_info(
    cpu: f32,
    breakdown: Option<CpuBreakdown>,
    memory: &MemoryInfo,
    storage: &[StorageInfo],
) -> String {
    let mut lines = cpu_lines(cpu, breakdown);
    lines.extend(memory_lines(memory));
    lines.extend(storage_lines(storage));
    lines.join("\n")
}

fn cpu_lines(cpu: f32, breakdown: Option<CpuBreakdown>) -> Vec<String> {
    let mut lines = vec![format!("CPU: {cpu:.1}%")];
    if let Some(b) = breakdown {
        lines.push(format!(" ├─ User: {:.1}%", b.user));
        lines.push(format!(" ├─ Kernel: {:.1}%", b.kernel));
        lines.push(format!(" └─ Idle: {:.1}%", b.idle));
    }
    lines
}

fn memory_lines(memory: &MemoryInfo) -> Vec<String> {
    vec![
        format!("Memory: {}%", memory.load_percent()),
        format!(" ├─ Total: {}", format_bytes(memory.total)),
        format!(" ├─ Used: {}", format_bytes(memory.used)),
        format!(" └─ Available: {}", format_bytes(memory.available)),
    ]
}

fn storage_lines(storage: &[StorageInfo]) -> Vec<String> {
    let mut lines = vec!["Storage:".to_string()];

    for (i, drive) in storage.iter().enumerate() {
        let last = i == storage.len() - 1;
        let (branch, indent) = if last { (" └─ ", "    ") } else { (" ├─ ", " │  ") };

        lines.push(format!("{branch}{}: {:.1}%", drive.name, drive.used_percent()));
        lines.push(format!("{indent} ├─ Used: {}", format_bytes(drive.used)));
        lines.push(format!("{indent} └─ Available: {}", format_bytes(drive.available)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const GB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn report_without_breakdown_or_drives() {
        let memory = MemoryInfo { total: 16 * GB, used: 4 * GB, available: 12 * GB };
        let text = system_info(12.345, None, &memory, &[]);
        assert_eq!(
            text,
            "CPU: 12.3%\n\
             Memory: 25%\n \
             ├─ Total: 16 GB\n \
             ├─ Used: 4 GB\n \
             └─ Available: 12 GB\n\
             Storage:"
        );
    }

    #[test]
    fn breakdown_adds_three_channel_lines() {
        let b = CpuBreakdown { user: 10.0, kernel: 5.0, idle: 85.0 };
        let lines = cpu_lines(15.0, Some(b));
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], " └─ Idle: 85.0%");
    }

    #[test]
    fn storage_tree_marks_last_drive() {
        let drives = [
            StorageInfo { name: "C Drive".into(), total: 4 * GB, used: GB, available: 3 * GB },
            StorageInfo { name: "D Drive".into(), total: 2 * GB, used: GB, available: GB },
        ];
        let lines = storage_lines(&drives);
        assert_eq!(lines[1], " ├─ C Drive: 25.0%");
        assert_eq!(lines[2], " │   ├─ Used: 1 GB");
        assert_eq!(lines[4], " └─ D Drive: 50.0%");
        assert_eq!(lines[6], "     └─ Available: 1 GB");
    }
}
