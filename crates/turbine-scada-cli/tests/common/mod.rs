use std::path::Path;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub const HEADER: &str = "Time,WEC: ava. windspeed,WEC : max. windspeed,WEC: ava. Power,\
WEC: ava. reactive Power,WEC: ava. available P from wind";

/// Three rows ten minutes apart, written out of order with one bad timestamp.
pub const SCENARIO_ROWS: &str = "\
01/05/2014 00:20:00,8.0,9.5,200,-5,260
01/05/2014 00:00:00,5.0,6.0,100,-12,140
not a date,1,1,1,1,1
01/05/2014 00:10:00,6.5,7.0,150,,190
";

pub fn write_scenario_csv(path: &Path) -> TestResult {
    std::fs::write(path, format!("{HEADER}\n{SCENARIO_ROWS}"))?;
    Ok(())
}

/// `rows` pseudo-random samples on a 10-minute grid starting 01/05/2014.
pub fn write_scada_csv(path: &Path, rows: usize) -> TestResult {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let base = chrono::NaiveDate::from_ymd_opt(2014, 5, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or("bad base date")?;

    let mut out = String::from(HEADER);
    out.push('\n');

    let mut seed = 0xBAD_5EED_u64;
    for i in 0..rows {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        let ts = base + chrono::Duration::minutes(10 * i as i64);
        let wind = (seed % 2_500) as f64 / 100.0;
        let gust = wind + 1.5;
        let power = (seed % 20_000) as f64;
        let reactive = (seed % 400) as f64 - 200.0;
        let available = power + 50.0;
        out.push_str(&format!(
            "{},{wind},{gust},{power},{reactive},{available}\n",
            ts.format("%d/%m/%Y %H:%M:%S")
        ));
    }

    std::fs::write(path, out)?;
    Ok(())
}
