use chrono::{DateTime, Utc};

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * 60;

/// Time left until `resets_at`, rounded up to whole minutes.
///
/// Empty when the reset is unknown or already past.
pub fn format_remaining(resets_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(resets_at) = resets_at else {
        return String::new();
    };
    let diff_ms = (resets_at - now).num_milliseconds();
    if diff_ms <= 0 {
        return String::new();
    }

    let mins = (diff_ms + 59_999) / 60_000;
    if mins >= MINUTES_PER_DAY {
        let days = mins / MINUTES_PER_DAY;
        let hours = (mins % MINUTES_PER_DAY) / MINUTES_PER_HOUR;
        return if hours > 0 {
            format!("{}d {}h", days, hours)
        } else {
            format!("{}d", days)
        };
    }
    if mins < MINUTES_PER_HOUR {
        return format!("{}m", mins);
    }

    let hours = mins / MINUTES_PER_HOUR;
    let rest = mins % MINUTES_PER_HOUR;
    if rest > 0 {
        format!("{}h {}m", hours, rest)
    } else {
        format!("{}h", hours)
    }
}

/// Length of a rate window: `5h`, `7d`, `90m`, or `?` when unknown
pub fn format_window(window_minutes: Option<f64>) -> String {
    let Some(minutes) = window_minutes.filter(|m| *m > 0.0) else {
        return "?".to_string();
    };

    let day = MINUTES_PER_DAY as f64;
    let hour = MINUTES_PER_HOUR as f64;
    if minutes % day == 0.0 {
        format!("{}d", minutes / day)
    } else if minutes % hour == 0.0 {
        format!("{}h", minutes / hour)
    } else {
        format!("{}m", minutes)
    }
}
