//! Status-box texts shown next to the chart.
//!
//! These mirror the dashboard's text readouts: which column is selected and
//! which dates the picker holds. They are plain strings so any front end can
//! render them.

use chrono::NaiveDateTime;

use crate::range::RangeFilter;
use crate::table::TimeSeriesTable;

/// Shown before a valid column has been picked.
pub const NOTHING_SELECTED: &str = "Nothing to display so far";

/// Shown while the date picker is empty.
pub const NO_DATES_SELECTED: &str = "Select a date to display";

const RANGE_PREFIX: &str = "You have selected: ";
const READOUT_DATE_FORMAT: &str = "%B %d, %Y - %H:%M:%S";

/// Human labels for well-known SCADA columns.
const COLUMN_DESCRIPTIONS: &[(&str, &str)] = &[
    ("WEC: ava. windspeed", "Average Windspeed"),
    ("WEC : max. windspeed", "Maximum Windspeed"),
    ("WEC: ava. Rotation", "Average rotation"),
];

/// Text for the column selector readout.
pub fn column_readout(table: &TimeSeriesTable, selected: &str) -> String {
    if table.has_column(selected) {
        format!("You chose the following column: \n{selected}")
    } else {
        NOTHING_SELECTED.to_string()
    }
}

/// Short description of a known SCADA column.
pub fn column_description(column: &str) -> Option<&'static str> {
    COLUMN_DESCRIPTIONS
        .iter()
        .find(|(name, _)| *name == column)
        .map(|(_, description)| *description)
}

fn readout_date(ts: NaiveDateTime) -> String {
    ts.format(READOUT_DATE_FORMAT).to_string()
}

/// Text for the date picker readout.
///
/// Reports the bounds as entered, including an end bound without a start
/// (which the series query ignores).
pub fn range_readout(range: &RangeFilter) -> String {
    let mut parts = Vec::with_capacity(2);
    if let Some(start) = range.start {
        parts.push(format!("Start Date: {}", readout_date(start)));
    }
    if let Some(end) = range.end {
        parts.push(format!("End Date: {}", readout_date(end)));
    }

    if parts.is_empty() {
        NO_DATES_SELECTED.to_string()
    } else {
        format!("{RANGE_PREFIX}{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::test_util::*;

    #[test]
    fn column_readout_tracks_selection() -> TestResult {
        let table = table_from_csv(SCENARIO_CSV)?;

        assert_eq!(
            column_readout(&table, "power"),
            "You chose the following column: \npower"
        );
        assert_eq!(column_readout(&table, ""), NOTHING_SELECTED);
        assert_eq!(column_readout(&table, "nonexistent"), NOTHING_SELECTED);
        Ok(())
    }

    #[test]
    fn known_columns_have_descriptions() {
        assert_eq!(
            column_description("WEC : max. windspeed"),
            Some("Maximum Windspeed")
        );
        assert_eq!(column_description("power"), None);
    }

    #[test]
    fn range_readout_formats_each_bound() {
        assert_eq!(range_readout(&RangeFilter::ALL), NO_DATES_SELECTED);

        let both = range(Some(ts(0, 0)), Some(ts(13, 5)));
        assert_eq!(
            range_readout(&both),
            "You have selected: Start Date: May 01, 2014 - 00:00:00 End Date: May 01, 2014 - 13:05:00"
        );

        let end_only = range(None, Some(ts(0, 10)));
        assert_eq!(
            range_readout(&end_only),
            "You have selected: End Date: May 01, 2014 - 00:10:00"
        );
    }
}
