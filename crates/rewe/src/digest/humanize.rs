//! Relative-time phrases for the digest ("3 days ago", "a week ago").

use chrono::{DateTime, Utc};

/// Turns the gap between `then` and `now` into a coarse relative phrase.
///
/// Timestamps at or after `now` collapse to "just now". The scale widens
/// from minutes through years, always rounding down, with "a"/"an" forms
/// for single units.
#[must_use]
pub fn humanize(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return phrase(minutes, "a minute ago", "minutes");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return phrase(hours, "an hour ago", "hours");
    }
    let days = hours / 24;
    if days < 7 {
        return phrase(days, "a day ago", "days");
    }
    if days < 31 {
        return phrase(days / 7, "a week ago", "weeks");
    }
    if days < 365 {
        return phrase(days / 30, "a month ago", "months");
    }
    phrase(days / 365, "a year ago", "years")
}

fn phrase(count: i64, singular: &str, unit: &str) -> String {
    if count <= 1 {
        singular.to_string()
    } else {
        format!("{count} {unit} ago")
    }
}
