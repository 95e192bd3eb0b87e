#![allow(missing_docs)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[allow(dead_code)]
mod test_common {
    include!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/common/mod.rs"));
}

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn scada() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("scada"))
}

fn scenario() -> TestResult<(TempDir, String)> {
    let tmp = TempDir::new()?;
    let csv = tmp.path().join("scada.csv");
    test_common::write_scenario_csv(&csv)?;
    let csv = csv.to_string_lossy().to_string();
    Ok((tmp, csv))
}

#[test]
fn columns_lists_sensor_headers() -> TestResult {
    let (_tmp, csv) = scenario()?;

    scada()
        .args(["columns", "--csv", &csv])
        .assert()
        .success()
        .stdout(predicate::str::contains("WEC: ava. windspeed"))
        .stdout(predicate::str::contains("WEC : max. windspeed  (Maximum Windspeed)"))
        .stdout(predicate::str::contains("WEC: ava. available P from wind"))
        .stdout(predicate::str::contains("rows: 3"))
        .stdout(predicate::str::contains(
            "range: 2014-05-01 00:00:00 .. 2014-05-01 00:20:00",
        ))
        .stdout(predicate::str::contains("Time").not());
    Ok(())
}

#[test]
fn series_applies_exclusive_start_inclusive_end() -> TestResult {
    let (_tmp, csv) = scenario()?;

    scada()
        .args([
            "series",
            "--csv",
            &csv,
            "--column",
            "WEC: ava. Power",
            "--start",
            "2014-05-01 00:00:00",
            "--end",
            "2014-05-01 00:10:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "You chose the following column: \nWEC: ava. Power",
        ))
        .stdout(predicate::str::contains(
            "You have selected: Start Date: May 01, 2014 - 00:00:00 End Date: May 01, 2014 - 00:10:00",
        ))
        .stdout(predicate::str::contains("2014-05-01 00:10:00"))
        .stdout(predicate::str::contains("150.0"))
        .stdout(predicate::str::contains("total_rows: 1"));
    Ok(())
}

#[test]
fn series_end_without_start_returns_every_row() -> TestResult {
    let (_tmp, csv) = scenario()?;

    scada()
        .args([
            "series",
            "--csv",
            &csv,
            "--column",
            "WEC: ava. Power",
            "--end",
            "2014-05-01 00:00:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("total_rows: 3"));
    Ok(())
}

#[test]
fn series_unknown_column_is_empty_not_an_error() -> TestResult {
    let (_tmp, csv) = scenario()?;

    scada()
        .args(["series", "--csv", &csv, "--column", "nonexistent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to display so far"))
        .stdout(predicate::str::contains("Select a date to display"))
        .stdout(predicate::str::contains("(no rows)"))
        .stdout(predicate::str::contains("total_rows: 0"));
    Ok(())
}

#[test]
fn series_writes_output_files() -> TestResult {
    let tmp = TempDir::new()?;
    let csv = tmp.path().join("scada.csv");
    test_common::write_scada_csv(&csv, 50)?;
    let csv = csv.to_string_lossy().to_string();

    let out_csv = tmp.path().join("wind.csv");
    scada()
        .args([
            "series",
            "--csv",
            &csv,
            "--column",
            "WEC: ava. windspeed",
            "--max-rows",
            "0",
            "--output",
            &out_csv.to_string_lossy(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("(preview suppressed"))
        .stdout(predicate::str::contains("total_rows: 50"))
        .stdout(predicate::str::contains("wrote:"));

    let contents = std::fs::read_to_string(&out_csv)?;
    assert_eq!(contents.lines().count(), 51);
    assert!(contents.starts_with("Time,WEC: ava. windspeed\n2014-05-01 00:00:00,"));

    let out_jsonl = tmp.path().join("wind.jsonl");
    scada()
        .args([
            "series",
            "--csv",
            &csv,
            "--column",
            "WEC: ava. windspeed",
            "--start",
            "01/05/2014 06:00",
            "--output",
            &out_jsonl.to_string_lossy(),
            "--format",
            "jsonl",
            "--timing",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("total_rows: 13"))
        .stdout(predicate::str::contains("elapsed_ms:"))
        .stdout(predicate::str::contains("(Jsonl)"));

    let contents = std::fs::read_to_string(&out_jsonl)?;
    assert_eq!(contents.lines().count(), 13);
    Ok(())
}

#[test]
fn point_reads_exact_timestamp() -> TestResult {
    let (_tmp, csv) = scenario()?;

    scada()
        .args(["point", "--csv", &csv, "--at", "2014-05-01 00:10:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Active Power: 150 MW"))
        .stdout(predicate::str::contains("Available Power from Wind: 190 MW"))
        .stdout(predicate::str::contains("Reactive Power: 0 MVAR"))
        .stdout(predicate::str::contains("Wind Speed: 6.5 m/s"))
        .stdout(predicate::str::contains("gauges read zero").not());
    Ok(())
}

#[test]
fn point_between_samples_reads_zero() -> TestResult {
    let (_tmp, csv) = scenario()?;

    scada()
        .args(["point", "--csv", &csv, "--at", "01/05/2014 00:05:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Active Power: 0 MW"))
        .stdout(predicate::str::contains("gauges read zero"));
    Ok(())
}

#[test]
fn config_overrides_gauge_columns() -> TestResult {
    let (tmp, csv) = scenario()?;
    let config = tmp.path().join("dashboard.json");
    std::fs::write(
        &config,
        r#"{"gauges": {"active_power": "WEC : max. windspeed"}}"#,
    )?;

    scada()
        .args([
            "point",
            "--csv",
            &csv,
            "--config",
            &config.to_string_lossy(),
            "--at",
            "2014-05-01 00:20:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Active Power: 9.5 MW"));
    Ok(())
}

#[test]
fn missing_csv_fails_with_message() -> TestResult {
    let tmp = TempDir::new()?;
    let missing = tmp.path().join("missing.csv");

    scada()
        .args(["columns", "--csv", &missing.to_string_lossy()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to load SCADA table"));
    Ok(())
}

#[test]
fn wrong_time_column_fails() -> TestResult {
    let (_tmp, csv) = scenario()?;

    scada()
        .args(["columns", "--csv", &csv, "--time-column", "Timestamp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Timestamp"));
    Ok(())
}

#[test]
fn invalid_bound_fails_before_loading() -> TestResult {
    let (_tmp, csv) = scenario()?;

    scada()
        .args([
            "series", "--csv", &csv, "--column", "WEC: ava. Power", "--start", "yesterday",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("yesterday"));
    Ok(())
}
