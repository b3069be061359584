//! Duration and date parsing
//!
//! Feeds disagree on formats: durations come as `HH:MM:SS`, `MM:SS`,
//! bare seconds, or ISO 8601 (`PT1H2M3S`); published dates come as
//! RFC 2822 or RFC 3339. Everything normalizes to seconds and UTC.

use chrono::{DateTime, Utc};

/// Parse a duration string into whole seconds.
///
/// Accepts `HH:MM:SS`, `MM:SS`, a bare number of seconds, and ISO 8601
/// `PT..` durations. Returns `None` for anything else, including totals
/// that overflow `u64` seconds.
pub fn parse_duration_seconds(input: &str) -> Option<u64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if input.starts_with("PT") || input.starts_with("pt") {
        return parse_iso8601(input);
    }

    if input.contains(':') {
        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() > 3 {
            return None;
        }
        let mut seconds: u64 = 0;
        for part in &parts {
            let n: u64 = part.parse().ok()?;
            seconds = seconds.checked_mul(60)?.checked_add(n)?;
        }
        return Some(seconds);
    }

    input.parse().ok()
}

/// Parse an ISO 8601 duration of the `PT#H#M#S` form.
fn parse_iso8601(input: &str) -> Option<u64> {
    let body = &input[2..];
    if body.is_empty() {
        return None;
    }
    let mut seconds: u64 = 0;
    let mut number = String::new();
    for ch in body.chars() {
        if ch.is_ascii_digit() {
            number.push(ch);
        } else {
            let n: u64 = number.parse().ok()?;
            number.clear();
            let amount = match ch.to_ascii_uppercase() {
                'H' => n.checked_mul(3600)?,
                'M' => n.checked_mul(60)?,
                'S' => n,
                _ => return None,
            };
            seconds = seconds.checked_add(amount)?;
        }
    }
    if !number.is_empty() {
        // Trailing digits without a unit designator
        return None;
    }
    Some(seconds)
}

/// Format whole seconds as `HH:MM:SS` (or `MM:SS` under an hour).
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Parse a feed timestamp, trying RFC 2822 then RFC 3339.
pub fn parse_published_date(input: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(input.trim())
        .or_else(|_| DateTime::parse_from_rfc3339(input.trim()))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
