//! CSV file data adapter.
//!
//! A series named `name` lives in `{base}/{name}.csv`. The header must
//! contain `time`; `open, high, low, close, value, volume` are optional and
//! may be left empty per row.

use crate::domain::bar::{Bar, DerivedPoint};
use crate::domain::error::PlotlineError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct BarRecord {
    time: String,
    #[serde(default)]
    open: Option<f64>,
    #[serde(default)]
    high: Option<f64>,
    #[serde(default)]
    low: Option<f64>,
    #[serde(default)]
    close: Option<f64>,
    #[serde(default)]
    value: Option<f64>,
    #[serde(default)]
    volume: Option<f64>,
}

#[derive(Debug, Serialize)]
struct DerivedRecord {
    time: f64,
    value: Option<f64>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", name))
    }

    /// Writes `time,value` rows to `path`; undefined values are left empty.
    pub fn write_derived(path: &Path, points: &[DerivedPoint]) -> Result<(), PlotlineError> {
        let file = fs::File::create(path).map_err(|e| PlotlineError::Data {
            reason: format!("failed to create {}: {}", path.display(), e),
        })?;
        Self::write_points(file, points)
    }

    pub fn write_points<W: io::Write>(
        writer: W,
        points: &[DerivedPoint],
    ) -> Result<(), PlotlineError> {
        let mut writer = csv::Writer::from_writer(writer);
        for point in points {
            writer
                .serialize(DerivedRecord {
                    time: point.time,
                    value: point.value,
                })
                .map_err(|e| PlotlineError::Data {
                    reason: format!("CSV write error: {}", e),
                })?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Unix seconds, or a `YYYY-MM-DD` calendar date taken at midnight UTC.
fn parse_time(raw: &str) -> Result<f64, PlotlineError> {
    let raw = raw.trim();
    if let Ok(seconds) = raw.parse::<f64>() {
        return Ok(seconds);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp() as f64)
        .ok_or_else(|| PlotlineError::Data {
            reason: format!("invalid time '{}', expected unix seconds or YYYY-MM-DD", raw),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_series(&self, name: &str) -> Result<Vec<Bar>, PlotlineError> {
        let path = self.csv_path(name);
        let content = fs::read_to_string(&path).map_err(|e| PlotlineError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.deserialize::<BarRecord>() {
            let record = result.map_err(|e| PlotlineError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            bars.push(Bar {
                time: parse_time(&record.time)?,
                open: record.open,
                high: record.high,
                low: record.low,
                close: record.close,
                value: record.value,
                volume: record.volume,
            });
        }

        bars.sort_by(|a, b| a.time.total_cmp(&b.time));
        debug!(series = name, bars = bars.len(), "loaded series");
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let ohlc = "time,open,high,low,close,volume\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n";
        fs::write(path.join("BHP.csv"), ohlc).unwrap();
        fs::write(
            path.join("ratio_base.csv"),
            "time,value\n1700000000,1.5\n1700000060,\n",
        )
        .unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_series_parses_dates_and_sorts() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_series("BHP").unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].time, 1_705_276_800.0);
        assert_eq!(bars[0].open, Some(100.0));
        assert_eq!(bars[0].high, Some(110.0));
        assert_eq!(bars[0].low, Some(90.0));
        assert_eq!(bars[0].close, Some(105.0));
        assert_eq!(bars[0].volume, Some(50000.0));
        assert_eq!(bars[0].value, None);
        assert!(bars.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn empty_fields_become_missing_values() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_series("ratio_base").unwrap();
        assert_eq!(bars[0].value, Some(1.5));
        assert!(bars[1].is_whitespace());
    }

    #[test]
    fn fetch_series_errors_for_missing_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let err = adapter.fetch_series("XYZ").unwrap_err();
        assert!(matches!(err, PlotlineError::Data { .. }));
    }

    #[test]
    fn bad_time_is_a_data_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.csv"), "time,close\n15/01/2024,1\n").unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let err = adapter.fetch_series("bad").unwrap_err();
        assert!(err.to_string().contains("15/01/2024"));
    }

    #[test]
    fn write_derived_leaves_undefined_empty() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.csv");
        let points = vec![DerivedPoint::new(60.0, Some(1.5)), DerivedPoint::whitespace(120.0)];

        CsvAdapter::write_derived(&out, &points).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "time,value");
        assert_eq!(lines[1], "60.0,1.5");
        assert_eq!(lines[2], "120.0,");
    }

    #[test]
    fn write_points_to_buffer() {
        let mut buffer = Vec::new();
        CsvAdapter::write_points(&mut buffer, &[DerivedPoint::new(1.0, Some(-2.5))]).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "time,value\n1.0,-2.5\n");
    }
}
