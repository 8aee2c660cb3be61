//! Display helpers.

/// Fixed-point with `decimals` places.
pub fn format_number(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// Compact magnitude: `1.5M`, `12.3K`, or the plain number below 1,000.
pub fn format_large_number(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{}M", format_number(value / 1_000_000.0, 1))
    } else if magnitude >= 1_000.0 {
        format!("{}K", format_number(value / 1_000.0, 1))
    } else {
        value.to_string()
    }
}
