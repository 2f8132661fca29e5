const SECONDS_PER_YEAR: u64 = 31_536_000;
const SECONDS_PER_DAY: u64 = 86_400;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_MINUTE: u64 = 60;

/// Format a duration in milliseconds as a compact string like `1d2h3m4s`.
///
/// Only non-zero components are printed. Years are fixed 365-day years.
/// Anything under one second is `< 1s`.
pub fn format_duration(millis: u64) -> String {
    let mut remaining = millis / 1000;
    let mut out = String::new();

    for (unit, suffix) in [
        (SECONDS_PER_YEAR, 'y'),
        (SECONDS_PER_DAY, 'd'),
        (SECONDS_PER_HOUR, 'h'),
        (SECONDS_PER_MINUTE, 'm'),
        (1, 's'),
    ] {
        let count = remaining / unit;
        if count > 0 {
            out.push_str(&count.to_string());
            out.push(suffix);
            remaining %= unit;
        }
    }

    if out.is_empty() {
        "< 1s".to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_one_second() {
        assert_eq!(format_duration(0), "< 1s");
        assert_eq!(format_duration(999), "< 1s");
    }

    #[test]
    fn test_seconds_and_minutes() {
        assert_eq!(format_duration(1_000), "1s");
        assert_eq!(format_duration(90_000), "1m30s");
        assert_eq!(format_duration(3_600_000), "1h");
    }

    #[test]
    fn test_all_components() {
        let millis = 31_536_000_000 + 86_400_000 + 3_661_000;
        assert_eq!(format_duration(millis), "1y1d1h1m1s");
    }

    #[test]
    fn test_skips_zero_components() {
        // 2 days and 5 seconds
        assert_eq!(format_duration(2 * 86_400_000 + 5_000), "2d5s");
    }
}
