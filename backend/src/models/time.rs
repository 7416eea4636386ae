use chrono::{DateTime, Duration, Utc};

/// Age of `past` relative to `now`. Negative when `past` lies in the future.
pub fn age(past: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    now.signed_duration_since(past)
}

/// Human readable "time ago" label used next to each listed location.
///
/// Each unit is rounded before moving to the next, so 90 seconds reads as
/// "2 minutes ago" and 36 hours as "2 days ago". Timestamps in the future
/// read as "just now".
pub fn elapsed_since(past: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let millis = age(past, now).num_milliseconds();
    let seconds = round_div(millis, 1000);
    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = round_div(seconds, 60);
    if minutes == 1 {
        return "a minute ago".to_string();
    }
    if minutes < 60 {
        return format!("{} minutes ago", minutes);
    }

    let hours = round_div(minutes, 60);
    if hours == 1 {
        return "an hour ago".to_string();
    }
    if hours < 24 {
        return format!("{} hours ago", hours);
    }

    let days = round_div(hours, 24);
    if days == 1 {
        return "yesterday".to_string();
    }
    if days < 7 {
        return format!("{} days ago", days);
    }

    let weeks = round_div(days, 7);
    if weeks == 1 {
        "a week ago".to_string()
    } else {
        format!("{} weeks ago", weeks)
    }
}

// Rounds half up for non-negative inputs.
fn round_div(value: i64, divisor: i64) -> i64 {
    (value + divisor / 2).div_euclid(divisor)
}
