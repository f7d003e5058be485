//! Date parsing for the formats the remote API mixes freely:
//! `DD-MM-YYYY`, `YYYY-MM-DD` and ISO/RFC 3339 timestamps.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Sort key for values that do not parse; orders before every real date.
pub const UNPARSABLE_DATE_KEY: i64 = i64::MIN;

pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    for format in ["%d-%m-%Y", "%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    // "2025-05-30T..." with an offset chrono rejects
    value
        .split_once('T')
        .and_then(|(date, _)| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
}

/// `YYYY*10000 + MM*100 + DD`, or [`UNPARSABLE_DATE_KEY`].
pub fn date_sort_key(raw: &str) -> i64 {
    parse_flexible_date(raw)
        .map(|d| i64::from(d.year()) * 10_000 + i64::from(d.month()) * 100 + i64::from(d.day()))
        .unwrap_or(UNPARSABLE_DATE_KEY)
}

/// `DD-MM-YYYY` for display; unparsable input is returned as is.
pub fn format_dmy(raw: &str) -> String {
    parse_flexible_date(raw)
        .map(|d| d.format("%d-%m-%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// `YYYY-MM-DD`, the value format of `<input type="date">`.
pub fn format_iso(raw: &str) -> Option<String> {
    parse_flexible_date(raw).map(|d| d.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_day_in_every_format() {
        assert_eq!(date_sort_key("30-05-2025"), 20250530);
        assert_eq!(date_sort_key("2025-05-30"), 20250530);
        assert_eq!(date_sort_key("2025-05-30T08:15:00.000Z"), 20250530);
        assert_eq!(date_sort_key("2025-05-30T08:15:00"), 20250530);
        assert_eq!(date_sort_key(" 30/05/2025 "), 20250530);
    }

    #[test]
    fn unparsable_is_minimum() {
        assert_eq!(date_sort_key(""), UNPARSABLE_DATE_KEY);
        assert_eq!(date_sort_key("soon"), UNPARSABLE_DATE_KEY);
        assert_eq!(date_sort_key("31-02-2025"), UNPARSABLE_DATE_KEY);
        assert!(date_sort_key("01-01-1970") > UNPARSABLE_DATE_KEY);
    }

    #[test]
    fn keys_order_chronologically() {
        assert!(date_sort_key("31-12-2024") < date_sort_key("01-01-2025"));
        assert!(date_sort_key("2025-02-01") > date_sort_key("28-01-2025"));
    }

    #[test]
    fn display_helpers() {
        assert_eq!(format_dmy("2025-05-30"), "30-05-2025");
        assert_eq!(format_dmy("n/a"), "n/a");
        assert_eq!(format_iso("30-05-2025").as_deref(), Some("2025-05-30"));
        assert_eq!(format_iso("nope"), None);
    }
}
