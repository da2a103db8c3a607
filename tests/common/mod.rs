#![allow(dead_code)]

use plotline::domain::bar::{Bar, DerivedPoint};
use plotline::domain::error::PlotlineError;
use plotline::ports::data_port::DataPort;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DAY: f64 = 86_400.0;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, name: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(name.to_string(), bars);
        self
    }

    pub fn with_error(mut self, name: &str, reason: &str) -> Self {
        self.errors.insert(name.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(&self, name: &str) -> Result<Vec<Bar>, PlotlineError> {
        if let Some(reason) = self.errors.get(name) {
            return Err(PlotlineError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(name).cloned().unwrap_or_default())
    }
}

/// OHLC bars one day apart with a one-point range around each close.
pub fn generate_bars(count: usize, start_price: f64) -> Vec<Bar> {
    (0..count)
        .map(|i| {
            let close = start_price + i as f64;
            Bar::ohlc(i as f64 * DAY, close - 0.5, close + 1.0, close - 1.0, close)
        })
        .collect()
}

pub fn close_bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::ohlc(i as f64 * DAY, c, c, c, c))
        .collect()
}

pub fn value_bars_at(points: &[(f64, f64)]) -> Vec<Bar> {
    points.iter().map(|&(t, v)| Bar::single(t, v)).collect()
}

pub fn values(points: &[DerivedPoint]) -> Vec<Option<f64>> {
    points.iter().map(|p| p.value).collect()
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Writes `bars` as `{dir}/{name}.csv` with every column present.
pub fn write_series_csv(dir: &Path, name: &str, bars: &[Bar]) -> PathBuf {
    let cell = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    let mut content = String::from("time,open,high,low,close,value\n");
    for bar in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.time,
            cell(bar.open),
            cell(bar.high),
            cell(bar.low),
            cell(bar.close),
            cell(bar.value)
        ));
    }
    let path = dir.join(format!("{name}.csv"));
    std::fs::write(&path, content).unwrap();
    path
}
