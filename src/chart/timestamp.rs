// Checkpoint timestamp parsing and chart label formatting

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, warn};
use regex::Regex;

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}").expect("year pattern is a valid regex"));

const DATE_TIME_FORMATS: [&str; 7] = [
    "%B %d, %Y - %I:%M %p",
    "%B %d, %Y %I:%M %p",
    "%B %d, %Y - %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%B %d, %Y", "%Y-%m-%d"];

const SLASH_DATE_TIME_FORMATS: [&str; 3] =
    ["%m/%d/%Y %I:%M %p", "%m/%d/%Y %H:%M", "%m/%d/%Y %H:%M:%S"];

/// Parses a checkpoint display timestamp.
///
/// Tries the formats the tracking feeds emit ("Feb 28, 2025 - 08:30 AM",
/// full month names, ISO-8601), then re-reads `MM/DD/YYYY[ time]` strings.
/// Date-only values resolve to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    parse_direct(raw).or_else(|| parse_slash_date(raw))
}

fn parse_direct(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return Some(date_time.naive_local());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn parse_slash_date(raw: &str) -> Option<NaiveDateTime> {
    let mut parts = raw.split('/');
    let (month, day, year_time) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let (year, time) = year_time.split_once(' ').unwrap_or((year_time, ""));
    let time = time.trim();

    if time.is_empty() {
        return NaiveDate::parse_from_str(&format!("{month}/{day}/{year}"), "%m/%d/%Y")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0));
    }
    let rebuilt = format!("{month}/{day}/{year} {time}");
    SLASH_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&rebuilt, format).ok())
}

/// `"<Mon> <day> - <h>:<mm><AM|PM>"`, e.g. `"Feb 28 - 8:30AM"`.
pub fn format_label(date_time: &NaiveDateTime) -> String {
    date_time.format("%b %-d - %-I:%M%p").to_string()
}

/// Derives the x-axis label for a checkpoint timestamp.
///
/// Unparseable strings containing a comma are shortened to
/// `"<before comma> -<after comma without the year>"`; anything else is
/// returned verbatim.
pub fn chart_label(raw: &str) -> String {
    if let Some(date_time) = parse_timestamp(raw) {
        return format_label(&date_time);
    }

    debug!("Could not parse checkpoint time {:?}, trying comma split", raw);
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() > 1 {
        return format!("{} -{}", parts[0], YEAR.replace(parts[1], "").trim());
    }

    warn!("Unrecognized checkpoint time {:?}, showing it verbatim", raw);
    raw.to_string()
}
