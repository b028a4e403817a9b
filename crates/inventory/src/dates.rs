//! Free-form date entry for purchase dates and the custom expiry control.

use chrono::{Datelike, Duration, NaiveDate};

/// Parse a user-entered date relative to `today`.
///
/// Accepted forms:
/// - `""`, `today`, `t` → today
/// - `yesterday`, `y`, `yd` → one day ago
/// - `+N`, `+Nd`, `in N days` → N days from today
/// - `N`, `Nd`, `N days ago` → N days ago
/// - `YYYY-MM-DD`
/// - `MM-DD` or `MM/DD` in the current year
///
/// Returns `None` for anything else, including impossible calendar dates,
/// signed counts such as `-3`, and offsets outside chrono's date range.
pub fn parse_date_input(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    parse_relative(text, today, BareCount::Past)
}

/// Like [`parse_date_input`], but a bare `N` or `Nd` counts forward.
///
/// Used where the date being entered is an expiry, so `5` means "in five
/// days". `N days ago` still counts back for items that already expired.
pub fn parse_expiry_input(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    parse_relative(text, today, BareCount::Future)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BareCount {
    Past,
    Future,
}

fn parse_relative(text: &str, today: NaiveDate, bare: BareCount) -> Option<NaiveDate> {
    let s = text.trim();
    let low = s.to_lowercase();

    match low.as_str() {
        "" | "today" | "t" => return Some(today),
        "yesterday" | "y" | "yd" => return shift(today, 1, BareCount::Past),
        _ => {}
    }

    if let Some(rest) = low.strip_prefix('+') {
        return day_count(rest).and_then(|n| shift(today, n, BareCount::Future));
    }
    if let Some(rest) = low.strip_prefix("in ") {
        return day_count(rest).and_then(|n| shift(today, n, BareCount::Future));
    }
    if let Some(rest) = low.strip_suffix("ago") {
        return day_count(rest).and_then(|n| shift(today, n, BareCount::Past));
    }
    if let Some(n) = day_count(&low) {
        return shift(today, n, bare);
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    let (month, day) = s.split_once(['-', '/'])?;
    let month: u32 = short_number(month)?;
    let day: u32 = short_number(day)?;
    NaiveDate::from_ymd_opt(today.year(), month, day)
}

fn shift(today: NaiveDate, days: i64, direction: BareCount) -> Option<NaiveDate> {
    let offset = Duration::try_days(days)?;
    match direction {
        BareCount::Past => today.checked_sub_signed(offset),
        BareCount::Future => today.checked_add_signed(offset),
    }
}

/// `N`, `Nd`, `N day`, `N days` (surrounding whitespace ignored). Unsigned only.
fn day_count(text: &str) -> Option<i64> {
    let t = text.trim();
    let digits = t
        .strip_suffix("days")
        .or_else(|| t.strip_suffix("day"))
        .or_else(|| t.strip_suffix('d'))
        .unwrap_or(t)
        .trim_end();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn short_number(text: &str) -> Option<u32> {
    if text.is_empty() || text.len() > 2 || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
