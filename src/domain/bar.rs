//! Bar and derived-point representation.
//!
//! A [`Bar`] is either an OHLC bar or a single-value bar. A bar with no
//! numeric fields at all is a whitespace bar: it keeps its slot on the time
//! axis but carries no data.

use crate::domain::error::PlotlineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix seconds. Strictly increasing across a series.
    pub time: f64,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl Bar {
    pub fn whitespace(time: f64) -> Self {
        Bar {
            time,
            ..Default::default()
        }
    }

    pub fn ohlc(time: f64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Bar {
            time,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            ..Default::default()
        }
    }

    pub fn single(time: f64, value: f64) -> Self {
        Bar {
            time,
            value: Some(value),
            ..Default::default()
        }
    }

    pub fn is_whitespace(&self) -> bool {
        self.open.is_none()
            && self.high.is_none()
            && self.low.is_none()
            && self.close.is_none()
            && self.value.is_none()
    }

    /// (high, low, close) when all three are numeric.
    pub fn hlc(&self) -> Option<(f64, f64, f64)> {
        Some((
            numeric(self.high)?,
            numeric(self.low)?,
            numeric(self.close)?,
        ))
    }

    /// (open, high, low, close) when all four are numeric.
    pub fn ohlc_values(&self) -> Option<(f64, f64, f64, f64)> {
        Some((
            numeric(self.open)?,
            numeric(self.high)?,
            numeric(self.low)?,
            numeric(self.close)?,
        ))
    }
}

/// Collapses NaN and infinities into "absent" so callers only ever test
/// for `None`.
pub fn numeric(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// One output sample of a transform. `value` is `None` wherever the
/// computation is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedPoint {
    pub time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl DerivedPoint {
    pub fn new(time: f64, value: Option<f64>) -> Self {
        DerivedPoint { time, value }
    }

    pub fn whitespace(time: f64) -> Self {
        DerivedPoint { time, value: None }
    }

    pub fn is_whitespace(&self) -> bool {
        self.value.is_none()
    }
}

/// Which bar field a transform reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceField {
    Open,
    High,
    Low,
    Close,
    Value,
    Volume,
}

impl SourceField {
    /// Fields probed, in priority order, when no source is configured.
    const DETECTION_ORDER: [SourceField; 2] = [SourceField::Close, SourceField::Value];

    pub fn read(&self, bar: &Bar) -> Option<f64> {
        let raw = match self {
            SourceField::Open => bar.open,
            SourceField::High => bar.high,
            SourceField::Low => bar.low,
            SourceField::Close => bar.close,
            SourceField::Value => bar.value,
            SourceField::Volume => bar.volume,
        };
        numeric(raw)
    }

    fn present(&self, bar: &Bar) -> bool {
        match self {
            SourceField::Open => bar.open.is_some(),
            SourceField::High => bar.high.is_some(),
            SourceField::Low => bar.low.is_some(),
            SourceField::Close => bar.close.is_some(),
            SourceField::Value => bar.value.is_some(),
            SourceField::Volume => bar.volume.is_some(),
        }
    }

    /// First bar exhibiting `close` or `value` decides; bars need not agree.
    pub fn detect(bars: &[Bar]) -> Option<SourceField> {
        bars.iter().find_map(|bar| {
            Self::DETECTION_ORDER
                .iter()
                .copied()
                .find(|field| field.present(bar))
        })
    }

    /// The configured source, or the detected one, or a configuration error.
    pub fn resolve(configured: Option<SourceField>, bars: &[Bar]) -> Result<SourceField, PlotlineError> {
        configured
            .or_else(|| Self::detect(bars))
            .ok_or_else(|| PlotlineError::configuration("source property required"))
    }
}

impl fmt::Display for SourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceField::Open => "open",
            SourceField::High => "high",
            SourceField::Low => "low",
            SourceField::Close => "close",
            SourceField::Value => "value",
            SourceField::Volume => "volume",
        };
        f.write_str(name)
    }
}

impl FromStr for SourceField {
    type Err = PlotlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(SourceField::Open),
            "high" => Ok(SourceField::High),
            "low" => Ok(SourceField::Low),
            "close" => Ok(SourceField::Close),
            "value" => Ok(SourceField::Value),
            "volume" => Ok(SourceField::Volume),
            other => Err(PlotlineError::configuration(format!(
                "unknown source field '{other}'"
            ))),
        }
    }
}

/// Every bar's time must be a finite number.
pub fn validate_times(bars: &[Bar]) -> Result<(), PlotlineError> {
    if bars.iter().all(|b| b.time.is_finite()) {
        Ok(())
    } else {
        Err(PlotlineError::validation(
            "All items must have a numeric time property",
        ))
    }
}

/// Reads `source` from every bar.
pub fn samples(bars: &[Bar], source: SourceField) -> Vec<Option<f64>> {
    bars.iter().map(|b| source.read(b)).collect()
}

/// Zips computed values back onto the bars' time axis. A result that
/// overflowed or went NaN is undefined.
pub fn to_points(bars: &[Bar], values: Vec<Option<f64>>) -> Vec<DerivedPoint> {
    bars.iter()
        .zip(values)
        .map(|(bar, value)| DerivedPoint::new(bar.time, numeric(value)))
        .collect()
}
