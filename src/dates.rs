//! Timestamp parsing and RSS date formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

/// RFC-1123 layout used for `<pubDate>` (always GMT).
const RFC1123: &str = "%a, %d %b %Y %H:%M:%S GMT";

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse the source-provided `discovered` field into UTC.
///
/// Accepts RFC 3339, naive `YYYY-MM-DD[ T]HH:MM:SS[.f]` (taken as UTC) and
/// bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_discovered(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

pub fn to_rfc1123(dt: &DateTime<Utc>) -> String {
    dt.format(RFC1123).to_string()
}

/// Parse a `<pubDate>` value.
///
/// Strict RFC 2822 first; then a lenient pass that ignores the weekday and
/// allows the time-of-day to be missing (`"Tue, 01 Jan 2024"`).
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(ts) = parse_rfc2822_to_unix(s) {
        return Utc.timestamp_opt(ts, 0).single();
    }
    parse_lenient(s)
}

fn parse_rfc2822_to_unix(ts: &str) -> Option<i64> {
    OffsetDateTime::parse(ts, &Rfc2822)
        .ok()
        .map(|dt| dt.unix_timestamp())
}

fn parse_lenient(s: &str) -> Option<DateTime<Utc>> {
    // weekday is advisory only; browsers ignore a mismatched one as well
    let body = match s.split_once(',') {
        Some((_, rest)) => rest.trim(),
        None => s,
    };

    if let Ok(dt) = DateTime::parse_from_str(body, "%d %b %Y %H:%M:%S %z") {
        return Some(dt.with_timezone(&Utc));
    }

    let body = ["GMT", "UTC", "UT", "Z"]
        .iter()
        .find_map(|zone| body.strip_suffix(zone))
        .map(str::trim_end)
        .unwrap_or(body);

    for fmt in ["%d %b %Y %H:%M:%S", "%d %b %Y %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(body, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }
    NaiveDate::parse_from_str(body, "%d %b %Y")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}
