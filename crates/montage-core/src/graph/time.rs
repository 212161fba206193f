//! `HH:MM:SS` time strings used by Trim nodes.

/// Convert `"HH:MM:SS"` to seconds (`H*3600 + M*60 + S`).
///
/// Strings with any other number of `:`-separated parts read as `0`, and so
/// does a part that is not a number. Seconds may be fractional.
pub fn time_str_to_seconds(time: &str) -> f64 {
    let parts: Vec<&str> = time.split(':').collect();
    if parts.len() != 3 {
        return 0.0;
    }

    let mut values = [0.0f64; 3];
    for (slot, part) in values.iter_mut().zip(&parts) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.parse::<f64>() {
            Ok(v) if v.is_finite() => *slot = v,
            _ => return 0.0,
        }
    }

    values[0] * 3600.0 + values[1] * 60.0 + values[2]
}
