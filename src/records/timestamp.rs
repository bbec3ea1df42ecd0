use chrono::DateTime;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats epoch seconds as `YYYY-MM-DD HH:MM:SS` (UTC)
///
/// Fractional seconds are dropped. Returns an empty string when the value is
/// not finite or falls outside the representable date range.
///
/// Output is always UTC and does not follow the host's local time zone, so
/// the same input renders identically on every machine.
pub fn format_timestamp(epoch_secs: f64) -> String {
    if !epoch_secs.is_finite() {
        return String::new();
    }

    let secs = epoch_secs.floor();
    if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
        return String::new();
    }

    DateTime::from_timestamp(secs as i64, 0)
        .map(|dt| dt.format(DATETIME_FORMAT).to_string())
        .unwrap_or_default()
}
