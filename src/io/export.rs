//! CSV and JSON export of depot run results.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::sim::compare::{DepotRun, Summary};
use crate::sim::curve::LoadCurve;
use crate::sim::types::ScheduleEntry;

/// Column header of the schedule CSV.
const SCHEDULE_HEADER: &str = "session_id,vehicle_id,bin_start,kw,kwh";

/// Column header of the load-curve CSV.
const LOAD_HEADER: &str = "bin_start,kw";

/// Timestamp layout used in every exported file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes schedule entries as CSV to any writer.
///
/// kW and kWh are rounded to three decimals.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_schedule_csv(entries: &[ScheduleEntry], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SCHEDULE_HEADER.split(','))?;

    for e in entries {
        wtr.write_record(&[
            e.session_id.clone(),
            e.vehicle_id.clone(),
            e.bin_start.format(TIMESTAMP_FORMAT).to_string(),
            format!("{:.3}", e.kw),
            format!("{:.3}", e.kwh),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes one row per grid bin as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_load_csv(load: &LoadCurve, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(LOAD_HEADER.split(','))?;

    for (bin_start, kw) in load.iter() {
        wtr.write_record(&[
            bin_start.format(TIMESTAMP_FORMAT).to_string(),
            format!("{kw:.3}"),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the cost/savings summary as pretty-printed JSON.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_summary_json(summary: &Summary, mut writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes every artifact of `run` into `dir`, creating it if needed.
///
/// Files: `summary.json`, `load_baseline.csv`, and per scenario
/// `load_<name>.csv` plus `optimized_schedule_<name>.csv`.
///
/// # Errors
///
/// Returns an `io::Error` if the directory or any file cannot be written.
pub fn export_outputs(run: &DepotRun, dir: &Path) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let path = dir.join("summary.json");
    write_summary_json(&run.summary(), create(&path)?)?;
    written.push(path);

    let path = dir.join("load_baseline.csv");
    write_load_csv(&run.baseline.load, create(&path)?)?;
    written.push(path);

    for scenario in &run.scenarios {
        let path = dir.join(format!("load_{}.csv", scenario.name));
        write_load_csv(&scenario.schedule.load, create(&path)?)?;
        written.push(path);

        let path = dir.join(format!("optimized_schedule_{}.csv", scenario.name));
        write_schedule_csv(&scenario.schedule.entries, create(&path)?)?;
        written.push(path);
    }

    info!(dir = %dir.display(), files = written.len(), "outputs exported");
    Ok(written)
}

fn create(path: &Path) -> io::Result<io::BufWriter<File>> {
    Ok(io::BufWriter::new(File::create(path)?))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::sim::compare::{ScenarioComparator, ScenarioSpec};
    use crate::sim::grid::TimeGrid;
    use crate::sim::tariff::Tariff;
    use crate::sim::types::ChargingSession;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 17)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .expect("valid timestamp")
    }

    fn entry(id: &str, bin_start: NaiveDateTime, kw: f64) -> ScheduleEntry {
        ScheduleEntry {
            session_id: id.into(),
            vehicle_id: format!("V-{id}"),
            bin_start,
            kw,
            kwh: kw * 0.25,
        }
    }

    fn lines(buf: Vec<u8>) -> Vec<String> {
        String::from_utf8(buf)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn schedule_header_and_rounding() {
        let entries = vec![entry("S1", at(18, 15), 7.123_456)];
        let mut buf = Vec::new();
        write_schedule_csv(&entries, &mut buf).ok();
        let lines = lines(buf);
        assert_eq!(lines[0], "session_id,vehicle_id,bin_start,kw,kwh");
        assert_eq!(lines[1], "S1,V-S1,2026-02-17 18:15:00,7.123,1.781");
    }

    #[test]
    fn load_csv_has_row_per_bin() {
        let grid = TimeGrid::new(at(0, 0), 24, 15);
        let mut load = LoadCurve::zeros(&grid);
        load.add_kw(1, 12.5);
        let mut buf = Vec::new();
        write_load_csv(&load, &mut buf).ok();
        let lines = lines(buf);
        // 1 header + 96 bins
        assert_eq!(lines.len(), 97);
        assert_eq!(lines[2], "2026-02-17 00:15:00,12.500");
    }

    #[test]
    fn deterministic_output() {
        let entries: Vec<_> = (0..5).map(|i| entry(&format!("S{i}"), at(18, 0), 7.4)).collect();
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_schedule_csv(&entries, &mut buf1).ok();
        write_schedule_csv(&entries, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn export_outputs_writes_every_file() {
        let sessions = vec![ChargingSession {
            session_id: "S1".into(),
            vehicle_id: "V1".into(),
            earliest_start: at(18, 0),
            latest_end: at(20, 0),
            energy_kwh: 10.0,
            max_kw: 11.0,
        }];
        let grid = TimeGrid::new(at(0, 0), 24, 15);
        let tariff = Tariff::depot_tou();
        let specs = vec![ScenarioSpec {
            name: "expected".into(),
            depot_power_cap_kw: 50.0,
        }];
        let run = ScenarioComparator::new(&sessions, &grid, &tariff, 4).compare(&specs);

        let dir = std::env::temp_dir().join(format!("depot-sim-export-{}", std::process::id()));
        let written = export_outputs(&run, &dir).expect("export succeeds");
        let names: Vec<String> = written
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        assert_eq!(
            names,
            vec![
                "summary.json",
                "load_baseline.csv",
                "load_expected.csv",
                "optimized_schedule_expected.csv",
            ]
        );

        let json = fs::read_to_string(dir.join("summary.json")).unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["scenarios"]["expected"]["depot_power_cap_kw"], 50.0);
        fs::remove_dir_all(&dir).ok();
    }
}
