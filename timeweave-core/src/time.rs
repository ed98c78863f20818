//! Time utilities: `HH:MM` parsing, duration text, and local wall-clock to UTC.

use std::sync::OnceLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use regex::Regex;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// English weekday names, Monday first. These are the only names the engine matches.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn hhmm_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("valid HH:MM regex"))
}

/// Parse a 24-hour, zero-padded `"HH:MM"` into minutes since midnight.
///
/// Anything else (`"9:00"`, `"24:00"`, `"09:60"`, whitespace) is `None`; callers
/// substitute their own default rather than failing.
pub fn parse_hhmm(s: &str) -> Option<u32> {
    let caps = hhmm_re().captures(s)?;
    let h: u32 = caps[1].parse().ok()?;
    let m: u32 = caps[2].parse().ok()?;
    Some(h * 60 + m)
}

/// Format minutes since midnight as `"HH:MM"`. `1440` formats as `"24:00"`.
pub fn format_hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Human duration text: `"45m"`, `"2h"`, `"1h 30m"`.
pub fn format_duration(minutes: u32) -> String {
    let (h, m) = (minutes / 60, minutes % 60);
    match (h, m) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Round `minutes` to the nearest multiple of `step` (halves round up).
pub fn snap_minutes(minutes: u32, step: u32) -> u32 {
    if step == 0 {
        return minutes;
    }
    (minutes.saturating_add(step / 2) / step) * step
}

pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize]
}

/// Exact, case-sensitive match against the English full names.
pub fn is_weekday_name(s: &str) -> bool {
    WEEKDAY_NAMES.contains(&s)
}

/// Convert a local wall-clock minute on `date` to a UTC instant.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times that do
/// not exist (DST spring-forward) resolve to the first valid minute after the gap.
pub fn local_to_utc(date: NaiveDate, minute_of_day: u32, tz: Tz) -> Option<DateTime<Utc>> {
    let midnight = date.and_time(NaiveTime::MIN);
    let mut ndt = midnight + Duration::minutes(minute_of_day as i64);
    // Gaps are at most a couple of hours; walk forward until the zone accepts the time.
    for _ in 0..=180 {
        if let Some(dt) = tz.from_local_datetime(&ndt).earliest() {
            return Some(dt.with_timezone(&Utc));
        }
        ndt += Duration::minutes(1);
    }
    None
}
