//! The time-sensitive PAC predicates: `weekdayRange`, `dateRange`, `timeRange`.
//!
//! Range endpoints are built by replacing fields of the current instant, so
//! every unreplaced field compares equal to "now" and boundary checks come out
//! inclusive. An optional trailing `"GMT"` argument switches from local time
//! to UTC.

use chrono::{Datelike, NaiveDateTime, Timelike};
use wpadproxy_domain::wallclock::{self, apply_date_token, month_number, weekday_index};

/// Strip a trailing `"GMT"` sentinel; returns the remaining arguments and
/// whether UTC was requested.
fn split_gmt(args: &[String]) -> (&[String], bool) {
    match args.split_last() {
        Some((last, rest)) if last == "GMT" => (rest, true),
        _ => (args, false),
    }
}

pub(super) fn weekday_range(args: &[String]) -> bool {
    let (args, gmt) = split_gmt(args);
    weekday_range_at(wallclock::now(gmt), args)
}

pub(super) fn date_range(args: &[String]) -> bool {
    let (args, gmt) = split_gmt(args);
    date_range_at(wallclock::now(gmt), args)
}

pub(super) fn time_range(args: &[String]) -> Result<bool, String> {
    let (args, gmt) = split_gmt(args);
    time_range_at(wallclock::now(gmt), args)
}

fn weekday_range_at(now: NaiveDateTime, args: &[String]) -> bool {
    let today = now.weekday().num_days_from_sunday();
    match args {
        [w1] => weekday_index(w1) == Some(today),
        [w1, w2] => match (weekday_index(w1), weekday_index(w2)) {
            (Some(start), Some(end)) if start <= end => (start..=end).contains(&today),
            // Wrap-around, e.g. FRI..MON covers the weekend.
            (Some(start), Some(end)) => today >= start || today <= end,
            _ => false,
        },
        _ => false,
    }
}

fn date_range_at(now: NaiveDateTime, args: &[String]) -> bool {
    match args.len() {
        1 => single_date_matches(now, &args[0]),
        2 | 4 | 6 | 8 => {
            let (first, second) = args.split_at(args.len() / 2);
            let Some(date1) = build_endpoint(now, first) else {
                return false;
            };
            let Some(date2) = build_endpoint(now, second) else {
                return false;
            };
            if date1 <= date2 {
                date1 <= now && now <= date2
            } else {
                now >= date1 || now <= date2
            }
        }
        _ => false,
    }
}

/// One-argument `dateRange`: integers below 32 test the day of month, 32 and
/// above test the year, anything else must be a month token.
fn single_date_matches(now: NaiveDateTime, token: &str) -> bool {
    if let Ok(value) = token.parse::<i64>() {
        if value < 32 {
            return i64::from(now.day()) == value;
        }
        return i64::from(now.year()) == value;
    }
    month_number(token) == Some(now.month())
}

fn build_endpoint(base: NaiveDateTime, tokens: &[String]) -> Option<NaiveDateTime> {
    let mut endpoint = base;
    for token in tokens {
        endpoint = apply_date_token(endpoint, token)?;
    }
    Some(endpoint)
}

fn time_range_at(now: NaiveDateTime, args: &[String]) -> Result<bool, String> {
    match args {
        [h] => Ok(parse_field(h) == Some(now.hour())),
        [h1, h2] => Ok(match (parse_field(h1), parse_field(h2)) {
            (Some(start), Some(end)) => start <= now.hour() && now.hour() <= end,
            _ => false,
        }),
        [h1, m1, h2, m2] => {
            let bounds = (|| {
                let start = now.with_hour(parse_field(h1)?)?.with_minute(parse_field(m1)?)?;
                // Inclusive to the end of the closing minute.
                let end = now
                    .with_hour(parse_field(h2)?)?
                    .with_minute(parse_field(m2)?)?
                    .with_second(59)?;
                Some((start, end))
            })();
            Ok(bounds.is_some_and(|(start, end)| start <= now && now <= end))
        }
        [h1, m1, s1, h2, m2, s2] => {
            let bounds = (|| {
                let start = now
                    .with_hour(parse_field(h1)?)?
                    .with_minute(parse_field(m1)?)?
                    .with_second(parse_field(s1)?)?;
                let end = now
                    .with_hour(parse_field(h2)?)?
                    .with_minute(parse_field(m2)?)?
                    .with_second(parse_field(s2)?)?;
                Some((start, end))
            })();
            Ok(bounds.is_some_and(|(start, end)| start <= now && now <= end))
        }
        _ => Err(format!(
            "timeRange: unsupported argument count {}",
            args.len()
        )),
    }
}

fn parse_field(token: &str) -> Option<u32> {
    token.parse().ok()
}
