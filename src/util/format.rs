// relaydash - util/format.rs
//
// Human-readable byte formatting for bandwidth stats.
// Decimal units (k = 1000) and significant-digit rounding, matching
// the display convention of the dashboard widgets.

const UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Format a byte count with the given number of decimals of extra precision.
///
/// `decimals` is the precision knob used by the dashboard widgets: the value
/// is rendered with `decimals + 1` significant digits (e.g. `decimals = 2`
/// turns 1500 into "1.50 KB").
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Byte".to_string();
    }

    let digits = decimals + 1;
    let k = 1000f64;
    let magnitude = ((bytes as f64).ln() / k.ln()).floor() as usize;
    let magnitude = magnitude.min(UNITS.len() - 1);
    let value = bytes as f64 / k.powi(magnitude as i32);

    format!("{} {}", to_precision(value, digits), UNITS[magnitude])
}

/// Format a byte rate (`format_bytes` with a "/sec" suffix).
pub fn format_bytes_per_sec(bytes: u64, decimals: usize) -> String {
    format!("{}/sec", format_bytes(bytes, decimals))
}

/// Round `value` to `digits` significant digits.
///
/// Only called with values in [1, 1000) so no exponent notation is needed.
fn to_precision(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let exponent = value.abs().log10().floor() as i64;
    let places = (digits as i64 - 1 - exponent).max(0) as usize;
    format!("{value:.places$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_bytes() {
        assert_eq!(format_bytes(0, 2), "0 Byte");
    }

    #[test]
    fn test_sub_kilobyte_values_stay_in_bytes() {
        assert_eq!(format_bytes(512, 2), "512 Bytes");
    }

    #[test]
    fn test_kilobyte_rounding() {
        assert_eq!(format_bytes(1_500, 2), "1.50 KB");
        assert_eq!(format_bytes(999_999, 2), "1000 KB");
    }

    #[test]
    fn test_megabytes_and_above() {
        assert_eq!(format_bytes(1_000_000, 2), "1.00 MB");
        assert_eq!(format_bytes(2_500_000_000, 2), "2.50 GB");
    }

    #[test]
    fn test_rate_suffix() {
        assert_eq!(format_bytes_per_sec(1_024, 2), "1.02 KB/sec");
    }
}
