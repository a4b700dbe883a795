//! Report formatting helpers.

use std::time::Duration;

/// Format a run's wall time: milliseconds below one second, seconds above.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{:.1}ms", secs * 1000.0)
    } else {
        format!("{secs:.2}s")
    }
}

/// Format a ratio in `[0, 1]` as a percentage.
#[must_use]
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_runs_show_milliseconds() {
        assert_eq!(format_duration(Duration::ZERO), "0.0ms");
        assert_eq!(format_duration(Duration::from_micros(2400)), "2.4ms");
        assert_eq!(format_duration(Duration::from_millis(999)), "999.0ms");
    }

    #[test]
    fn long_runs_show_seconds() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_secs(90)), "90.00s");
    }

    #[test]
    fn format_ratio_percent() {
        assert_eq!(format_ratio(0.0), "0.0%");
        assert_eq!(format_ratio(0.25), "25.0%");
        assert_eq!(format_ratio(1.0), "100.0%");
    }
}
