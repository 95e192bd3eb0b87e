//! Timestamp parsing and conversion helpers.
//!
//! SCADA exports write their `Time` column as a day-first local wall-clock
//! string (for example `01/05/2014 00:10:00` is the 1st of May). The table
//! keeps timestamps as naive milliseconds since the Unix epoch in an Arrow
//! `Timestamp(Millisecond, None)` column; no timezone is attached because the
//! source data carries none.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Day-first date-time layouts accepted for table cells.
const DAY_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DAY_FIRST_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// ISO layouts; unambiguous, so accepted alongside the day-first ones.
const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Display layout used by every front end.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse an ISO (`YYYY-MM-DD[ T]HH:MM[:SS]`) date-time or a bare ISO date
/// (midnight).
pub fn parse_iso(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    ISO_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, ISO_DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parse a day-first date-time cell the way the SCADA export writes it.
///
/// Day-first layouts are tried before ISO ones, so `01/05/2014` is always the
/// 1st of May. Returns `None` for anything unparseable; the loader drops
/// such rows.
pub fn parse_day_first(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    DAY_FIRST_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DAY_FIRST_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .or_else(|| parse_iso(s))
}

/// Naive wall-clock time to the stored millisecond representation.
pub fn to_millis(ts: NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_millis()
}

/// Stored millisecond representation back to a naive wall-clock time.
///
/// `None` only for values outside chrono's representable range, which the
/// loader never produces.
pub fn from_millis(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|d| d.and_hms_opt(h, mi, s))
            .expect("valid test datetime")
    }

    #[test]
    fn day_first_is_preferred_over_month_first() {
        assert_eq!(
            parse_day_first("01/05/2014 00:10:00"),
            Some(dt(2014, 5, 1, 0, 10, 0))
        );
        assert_eq!(
            parse_day_first("13/05/2014 23:50"),
            Some(dt(2014, 5, 13, 23, 50, 0))
        );
        assert_eq!(parse_day_first("09.04.2015"), Some(dt(2015, 4, 9, 0, 0, 0)));
    }

    #[test]
    fn iso_cells_are_accepted() {
        assert_eq!(
            parse_day_first("2014-05-01 00:20:00"),
            Some(dt(2014, 5, 1, 0, 20, 0))
        );
        assert_eq!(
            parse_day_first("2014-05-01T00:20"),
            Some(dt(2014, 5, 1, 0, 20, 0))
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_day_first(""), None);
        assert_eq!(parse_day_first("   "), None);
        assert_eq!(parse_day_first("not a date"), None);
        assert_eq!(parse_day_first("32/01/2014 00:00:00"), None);
        assert_eq!(parse_day_first("01/13/2014 00:00:00"), None);
    }

    #[test]
    fn millis_conversion_is_lossless() {
        let ts = dt(2014, 5, 1, 0, 10, 0);
        let ms = to_millis(ts);
        assert_eq!(ms, 1_398_903_000_000);
        assert_eq!(from_millis(ms), Some(ts));
    }
}
