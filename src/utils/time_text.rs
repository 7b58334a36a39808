//! Conversions between signed minute counts and "HH:MM" text.
//!
//! Minutes are the storage form. The text form is what forms submit and what the
//! API renders next to balances.

use once_cell::sync::Lazy;
use regex::Regex;

static STRICT_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-)?([0-9]{1,2}):([0-9]{2})$").expect("valid time pattern"));

/// Tolerant parse of "HH:MM", "-HH:MM" or bare digits into signed minutes.
///
/// Never fails. Components that do not parse count as zero, minutes of 60 or more
/// carry into hours, and the sign is applied once to the combined total. Totals
/// outside the `i64` range clamp to its bounds.
pub fn parse_time_text(text: &str) -> i64 {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim()),
        None => (false, text),
    };

    let (hours, minutes) = match body.split_once(':') {
        Some((h, m)) => (parse_component(h), parse_component(m)),
        None => split_digits(body),
    };

    // magnitude in i128 so that i64::MIN survives the negation
    let hours = hours.saturating_add(minutes / 60);
    let minutes = minutes % 60;
    let total = hours.saturating_mul(60).saturating_add(minutes);
    let signed = if negative { -total } else { total };

    i64::try_from(signed).unwrap_or(if negative { i64::MIN } else { i64::MAX })
}

fn parse_component(raw: &str) -> i128 {
    raw.trim()
        .parse::<i128>()
        .ok()
        .filter(|v| *v >= 0)
        .unwrap_or(0)
}

/// Positional reading of a digit run without a colon.
fn split_digits(body: &str) -> (i128, i128) {
    let digits: String = body.chars().filter(char::is_ascii_digit).collect();
    let value = digits.parse::<i128>().unwrap_or(0);

    match digits.len() {
        // HMM / HHMM
        3 | 4 => (value / 100, value % 100),
        // "75" reads as 0h75 and carries to 01:15 either way
        _ if value > 60 => (value / 100, value % 100),
        _ => (0, value),
    }
}

/// Render signed minutes as "HH:MM", prefixed with "-" for negative values.
pub fn format_minutes(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let abs = minutes.unsigned_abs();
    format!("{sign}{:02}:{:02}", abs / 60, abs % 60)
}

/// Strict gate for form input: `H:MM` or `HH:MM`, minutes below 60, and a leading
/// "-" only where the field accepts debits.
pub fn is_valid_time_text(text: &str, allow_negative: bool) -> bool {
    let Some(caps) = STRICT_TIME.captures(text) else {
        return false;
    };

    if caps.get(1).is_some() && !allow_negative {
        return false;
    }

    caps.get(3)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .is_some_and(|m| m < 60)
}
