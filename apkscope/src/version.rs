/// Keeps only the first two dot separated components of an Android version:
/// `7.1.2` becomes `7.1`, while `9` and `8.0` are returned unchanged.
pub fn truncate_version(version: &str) -> &str {
    let first = match version.find('.') {
        Some(v) => v,
        None => return version,
    };
    match version[first + 1..].find('.') {
        Some(second) => &version[..first + 1 + second],
        None => version,
    }
}

/// Numeric form of the version used to pick a hashing strategy
pub fn numeric_version(version: &str) -> Option<f32> {
    truncate_version(version.trim()).parse::<f32>().ok()
}
