//! Due-date expressions for `create_task`.
//!
//! Accepts a relative form `+<n> <unit>` (days, weeks or months, singular or
//! plural, any case) or an absolute timestamp. Anything else resolves to no
//! due date.

use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use regex::Regex;
use std::sync::LazyLock;

static RELATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\+\s*(\d+)\s*(days?|weeks?|months?)$").expect("relative pattern is valid")
});

/// Resolve `expr` against `now`.
pub fn resolve_due_date(expr: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let expr = expr.trim();
    if expr.is_empty() {
        return None;
    }

    if let Some(caps) = RELATIVE.captures(expr) {
        let amount: u32 = caps[1].parse().ok()?;
        let unit = caps[2].to_ascii_lowercase();
        return match unit.trim_end_matches('s') {
            "day" => now.checked_add_signed(TimeDelta::try_days(i64::from(amount))?),
            "week" => now.checked_add_signed(TimeDelta::try_weeks(i64::from(amount))?),
            "month" => now.checked_add_months(Months::new(amount)),
            _ => None,
        };
    }

    parse_absolute(expr)
}

fn parse_absolute(expr: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(expr) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(expr, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(expr, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
