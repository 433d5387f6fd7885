use runcat_core::StorageInfo;
use std::path::Path;
use sysinfo::Disks;

/// Read usage of every mounted drive, one entry per mount point.
pub fn read_storage() -> Vec<StorageInfo> {
    let disks = Disks::new_with_refreshed_list();

    let mut drives: Vec<StorageInfo> = disks
        .iter()
        .filter(|d| d.total_space() > 0)
        .map(|d| {
            let total = d.total_space();
            let available = d.available_space().min(total);
            StorageInfo {
                name: drive_name(d.mount_point()),
                total,
                used: total - available,
                available,
            }
        })
        .collect();

    drives.sort_by(|a, b| a.name.cmp(&b.name));
    drives.dedup_by(|a, b| a.name == b.name);
    drives
}

/// `"C:\"` → `"C Drive"`; other mount points are shown as-is.
pub fn drive_name(mount_point: &Path) -> String {
    let raw = mount_point.to_string_lossy();
    let mut chars = raw.chars();
    match (chars.next(), chars.next(), chars.as_str()) {
        (Some(letter), Some(':'), rest)
            if letter.is_ascii_alphabetic() && (rest.is_empty() || rest == "\\" || rest == "/") =>
        {
            format!("{} Drive", letter.to_ascii_uppercase())
        }
        _ => raw.into_owned(),
    }
}
