use super::*;
use chrono::{Duration, NaiveDate};
use std::fmt::Write as _;

pub(crate) use crate::range::RangeFilter;

pub(crate) type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Three rows ten minutes apart: power 100/150/200, wind 5.0/6.5/8.0.
pub(crate) const SCENARIO_CSV: &str = "\
Time,power,wind
01/05/2014 00:00:00,100,5.0
01/05/2014 00:10:00,150,6.5
01/05/2014 00:20:00,200,8.0
";

#[derive(Debug, Clone)]
pub(crate) struct TestRow {
    pub(crate) ts: NaiveDateTime,
    pub(crate) power: Option<f64>,
    pub(crate) wind: Option<f64>,
}

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2014, 5, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid base datetime")
}

/// 2014-05-01 at `h:m`.
pub(crate) fn ts(h: u32, m: u32) -> NaiveDateTime {
    base() + Duration::hours(h as i64) + Duration::minutes(m as i64)
}

/// The `i`-th ten-minute sample slot after the base time.
pub(crate) fn slot(i: u64) -> NaiveDateTime {
    base() + Duration::minutes(10 * i as i64)
}

pub(crate) fn range(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> RangeFilter {
    RangeFilter::new(start, end)
}

pub(crate) fn lcg(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005).wrapping_add(1)
}

/// Unsorted rows on the ten-minute grid with duplicates and empty readings.
pub(crate) fn random_rows(seed: u64, rows: usize) -> Vec<TestRow> {
    let mut seed = seed;
    (0..rows)
        .map(|i| {
            seed = lcg(seed);
            let rnd = seed >> 16;
            TestRow {
                ts: slot(rnd % 72),
                power: (i % 7 != 3).then(|| (rnd % 20_000) as f64 / 10.0),
                wind: (i % 11 != 5).then(|| (rnd % 250) as f64 / 10.0),
            }
        })
        .collect()
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Render rows the way the SCADA export does (day-first `Time` column).
pub(crate) fn scada_csv(rows: &[TestRow]) -> String {
    let mut out = String::from("Time,power,wind\n");
    for row in rows {
        writeln!(
            out,
            "{},{},{}",
            row.ts.format("%d/%m/%Y %H:%M:%S"),
            cell(row.power),
            cell(row.wind)
        )
        .expect("writing to a String cannot fail");
    }
    out
}

pub(crate) fn table_from_csv(csv: &str) -> Result<TimeSeriesTable, LoadError> {
    TimeSeriesTable::load_csv_reader(csv.as_bytes(), &LoadOptions::default()).map(|(t, _)| t)
}
