use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Human readable size for the details panel. Anything at or below one unit
/// boundary stays in the smaller unit.
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if bytes > MIB {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    } else if bytes > KIB {
        format!("{:.2} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} bytes")
    }
}

/// Two values in `[0, 1]` derived from `key`. Stable across runs of the same build.
pub fn stable_unit_pair(key: &str) -> (f64, f64) {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    let hash = hasher.finish();

    let x = (hash & 0xffff_ffff) as f64 / u32::MAX as f64;
    let y = ((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64;
    (x, y)
}
