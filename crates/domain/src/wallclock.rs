//! Wall-clock helpers for the PAC temporal predicates.
//!
//! The temporal helpers build their range endpoints by replacing individual
//! fields of "now", so every unreplaced field stays equal to the current
//! instant and boundary comparisons hold exactly.

use chrono::{Datelike, Local, NaiveDateTime, Utc};

/// PAC weekday tokens, indexed 0–6.
pub const WEEKDAYS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// PAC month tokens, numbered 1–12.
pub const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Index of a weekday token (`SUN` = 0 … `SAT` = 6).
pub fn weekday_index(token: &str) -> Option<u32> {
    WEEKDAYS.iter().position(|d| *d == token).map(|i| i as u32)
}

/// Month number of a month token (`JAN` = 1 … `DEC` = 12).
pub fn month_number(token: &str) -> Option<u32> {
    MONTHS.iter().position(|m| *m == token).map(|i| i as u32 + 1)
}

/// The current instant, in UTC or local wall-clock time.
pub fn now(gmt: bool) -> NaiveDateTime {
    if gmt {
        Utc::now().naive_utc()
    } else {
        Local::now().naive_local()
    }
}

/// Apply one `dateRange` endpoint token to `base`.
///
/// Integers below 32 replace the day of month, 32 and above replace the year;
/// anything else must be a month token. `None` marks an unusable token or a
/// field combination that is not a real date.
pub fn apply_date_token(base: NaiveDateTime, token: &str) -> Option<NaiveDateTime> {
    if let Ok(value) = token.parse::<i64>() {
        if value < 32 {
            return base.with_day(u32::try_from(value).ok()?);
        }
        return base.with_year(i32::try_from(value).ok()?);
    }
    base.with_month(month_number(token)?)
}
