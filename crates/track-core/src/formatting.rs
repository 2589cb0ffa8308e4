/// Format a duration given in seconds as a compact human-readable string.
///
/// * `< 60` seconds → `"42s"`
/// * `< 60` minutes → `"5m 10s"` (seconds omitted when zero)
/// * otherwise      → `"3h 45m"` (minutes omitted when zero)
///
/// # Examples
///
/// ```
/// use track_core::formatting::format_duration;
///
/// assert_eq!(format_duration(0.0),      "0s");
/// assert_eq!(format_duration(42.4),     "42s");
/// assert_eq!(format_duration(310.0),    "5m 10s");
/// assert_eq!(format_duration(300.0),    "5m");
/// assert_eq!(format_duration(13_500.0), "3h 45m");
/// assert_eq!(format_duration(7_200.0),  "2h");
/// ```
pub fn format_duration(seconds: f64) -> String {
    let total_secs = seconds.max(0.0).round() as i64;
    if total_secs < 60 {
        return format!("{}s", total_secs);
    }

    let total_mins = total_secs / 60;
    if total_mins < 60 {
        let secs = total_secs % 60;
        if secs == 0 {
            format!("{}m", total_mins)
        } else {
            format!("{}m {}s", total_mins, secs)
        }
    } else {
        let hours = total_mins / 60;
        let mins = total_mins % 60;
        if mins == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, mins)
        }
    }
}

/// Format a duration given in seconds as whole minutes, e.g. `"17 min"`.
///
/// This is the leaderboard unit: sub-minute remainders are truncated, so an
/// application that has been active for 95 seconds shows `"1 min"`.
///
/// # Examples
///
/// ```
/// use track_core::formatting::format_whole_minutes;
///
/// assert_eq!(format_whole_minutes(0.0),    "0 min");
/// assert_eq!(format_whole_minutes(95.0),   "1 min");
/// assert_eq!(format_whole_minutes(3600.0), "60 min");
/// ```
pub fn format_whole_minutes(seconds: f64) -> String {
    let mins = (seconds.max(0.0) / 60.0).floor() as i64;
    format!("{} min", mins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_seconds() {
        assert_eq!(format_duration(0.0), "0s");
        assert_eq!(format_duration(1.0), "1s");
        assert_eq!(format_duration(59.4), "59s");
    }

    #[test]
    fn test_format_duration_minutes() {
        assert_eq!(format_duration(60.0), "1m");
        assert_eq!(format_duration(61.0), "1m 1s");
        assert_eq!(format_duration(3_599.0), "59m 59s");
    }

    #[test]
    fn test_format_duration_hours() {
        assert_eq!(format_duration(3_600.0), "1h");
        assert_eq!(format_duration(3_660.0), "1h 1m");
        assert_eq!(format_duration(86_400.0), "24h");
    }

    #[test]
    fn test_format_duration_negative_clamps() {
        assert_eq!(format_duration(-5.0), "0s");
    }

    #[test]
    fn test_format_duration_rounds_to_whole_seconds() {
        assert_eq!(format_duration(59.6), "1m");
    }

    #[test]
    fn test_format_whole_minutes_truncates() {
        assert_eq!(format_whole_minutes(119.9), "1 min");
        assert_eq!(format_whole_minutes(120.0), "2 min");
    }

    #[test]
    fn test_format_whole_minutes_negative_clamps() {
        assert_eq!(format_whole_minutes(-60.0), "0 min");
    }
}
