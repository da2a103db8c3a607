//! Indicator transforms.
//!
//! Every transform is a pure function `(bars, options) -> Vec<DerivedPoint>`
//! that returns exactly one point per input bar, time-aligned with it.
//! - [`IndicatorKind`]: indicator identity, parsed from config names
//! - [`IndicatorSpec`]: identity plus typed options, dispatches to the transform
//! - [`OptionsPatch`]: partial options update merged into a spec

pub mod average_price;
pub mod correlation;
pub mod ema;
pub mod median_price;
pub mod momentum;
pub mod moving_average;
pub mod percent_change;
pub mod ratio;
pub mod sma;
pub mod weighted_close;
pub mod wma;

use crate::domain::bar::{self, Bar, DerivedPoint, SourceField};
use crate::domain::error::PlotlineError;
use crate::domain::offset::apply_offset;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_LENGTH: usize = 10;
pub const DEFAULT_WEIGHT: f64 = 2.0;

/// Options shared by the rolling single-source transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowOptions {
    pub source: Option<SourceField>,
    pub length: usize,
    pub offset: i64,
}

impl Default for WindowOptions {
    fn default() -> Self {
        WindowOptions {
            source: None,
            length: DEFAULT_LENGTH,
            offset: 0,
        }
    }
}

impl WindowOptions {
    pub fn with_length(length: usize) -> Self {
        WindowOptions {
            length,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OffsetOptions {
    pub offset: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedCloseOptions {
    pub weight: f64,
    pub offset: i64,
}

impl Default for WeightedCloseOptions {
    fn default() -> Self {
        WeightedCloseOptions {
            weight: DEFAULT_WEIGHT,
            offset: 0,
        }
    }
}

/// Moving-average family member, used for the smoothing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovingAverageKind {
    Sma,
    Ema,
    Wma,
}

impl MovingAverageKind {
    pub fn apply(&self, samples: &[Option<f64>], length: usize) -> Vec<Option<f64>> {
        match self {
            MovingAverageKind::Sma => sma::sma_values(samples, length),
            MovingAverageKind::Ema => ema::ema_values(samples, length),
            MovingAverageKind::Wma => wma::wma_values(samples, length),
        }
    }
}

impl FromStr for MovingAverageKind {
    type Err = PlotlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sma" => Ok(MovingAverageKind::Sma),
            "ema" => Ok(MovingAverageKind::Ema),
            "wma" => Ok(MovingAverageKind::Wma),
            other => Err(PlotlineError::configuration(format!(
                "unknown smoothing method '{other}'"
            ))),
        }
    }
}

impl fmt::Display for MovingAverageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovingAverageKind::Sma => f.write_str("SMA"),
            MovingAverageKind::Ema => f.write_str("EMA"),
            MovingAverageKind::Wma => f.write_str("WMA"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothing {
    pub method: MovingAverageKind,
    pub length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmoothedAverageOptions {
    pub window: WindowOptions,
    pub smoothing: Option<Smoothing>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationOptions {
    pub primary_source: Option<SourceField>,
    pub secondary_source: Option<SourceField>,
    pub length: usize,
    pub allow_mismatched_dates: bool,
}

impl Default for CorrelationOptions {
    fn default() -> Self {
        CorrelationOptions {
            primary_source: None,
            secondary_source: None,
            length: DEFAULT_LENGTH,
            allow_mismatched_dates: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatioOptions {
    pub primary_source: Option<SourceField>,
    pub secondary_source: Option<SourceField>,
    pub allow_mismatched_dates: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Sma,
    Ema,
    Wma,
    MovingAverage,
    Momentum,
    WeightedClose,
    MedianPrice,
    AveragePrice,
    PercentChange,
    Correlation,
    Ratio,
}

impl IndicatorKind {
    pub fn needs_secondary(&self) -> bool {
        matches!(self, IndicatorKind::Correlation | IndicatorKind::Ratio)
    }

    /// Whether the output lives on the price scale of the base series, as
    /// opposed to a separate oscillator pane.
    pub fn is_overlay(&self) -> bool {
        matches!(
            self,
            IndicatorKind::Sma
                | IndicatorKind::Ema
                | IndicatorKind::Wma
                | IndicatorKind::MovingAverage
                | IndicatorKind::WeightedClose
                | IndicatorKind::MedianPrice
                | IndicatorKind::AveragePrice
        )
    }
}

impl FromStr for IndicatorKind {
    type Err = PlotlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "sma" => Ok(IndicatorKind::Sma),
            "ema" => Ok(IndicatorKind::Ema),
            "wma" => Ok(IndicatorKind::Wma),
            "movingaverage" | "ma" => Ok(IndicatorKind::MovingAverage),
            "momentum" | "mom" => Ok(IndicatorKind::Momentum),
            "weightedclose" => Ok(IndicatorKind::WeightedClose),
            "medianprice" => Ok(IndicatorKind::MedianPrice),
            "averageprice" => Ok(IndicatorKind::AveragePrice),
            "percentchange" => Ok(IndicatorKind::PercentChange),
            "correlation" | "correl" => Ok(IndicatorKind::Correlation),
            "ratio" => Ok(IndicatorKind::Ratio),
            _ => Err(PlotlineError::configuration(format!(
                "unknown indicator type '{}'",
                s.trim()
            ))),
        }
    }
}

/// Partial options update. Fields that do not apply to the target
/// indicator are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OptionsPatch {
    pub source: Option<SourceField>,
    pub secondary_source: Option<SourceField>,
    pub length: Option<usize>,
    pub offset: Option<i64>,
    pub weight: Option<f64>,
    /// `Some(None)` switches smoothing off.
    pub smoothing: Option<Option<Smoothing>>,
    pub allow_mismatched_dates: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorSpec {
    Sma(WindowOptions),
    Ema(WindowOptions),
    Wma(WindowOptions),
    MovingAverage(SmoothedAverageOptions),
    Momentum(WindowOptions),
    WeightedClose(WeightedCloseOptions),
    MedianPrice(OffsetOptions),
    AveragePrice(OffsetOptions),
    PercentChange(OffsetOptions),
    Correlation(CorrelationOptions),
    Ratio(RatioOptions),
}

impl IndicatorSpec {
    /// The spec for `kind` with default options.
    pub fn default_for(kind: IndicatorKind) -> Self {
        match kind {
            IndicatorKind::Sma => IndicatorSpec::Sma(WindowOptions::default()),
            IndicatorKind::Ema => IndicatorSpec::Ema(WindowOptions::default()),
            IndicatorKind::Wma => IndicatorSpec::Wma(WindowOptions::default()),
            IndicatorKind::MovingAverage => {
                IndicatorSpec::MovingAverage(SmoothedAverageOptions::default())
            }
            IndicatorKind::Momentum => IndicatorSpec::Momentum(WindowOptions::default()),
            IndicatorKind::WeightedClose => {
                IndicatorSpec::WeightedClose(WeightedCloseOptions::default())
            }
            IndicatorKind::MedianPrice => IndicatorSpec::MedianPrice(OffsetOptions::default()),
            IndicatorKind::AveragePrice => IndicatorSpec::AveragePrice(OffsetOptions::default()),
            IndicatorKind::PercentChange => IndicatorSpec::PercentChange(OffsetOptions::default()),
            IndicatorKind::Correlation => IndicatorSpec::Correlation(CorrelationOptions::default()),
            IndicatorKind::Ratio => IndicatorSpec::Ratio(RatioOptions::default()),
        }
    }

    pub fn kind(&self) -> IndicatorKind {
        match self {
            IndicatorSpec::Sma(_) => IndicatorKind::Sma,
            IndicatorSpec::Ema(_) => IndicatorKind::Ema,
            IndicatorSpec::Wma(_) => IndicatorKind::Wma,
            IndicatorSpec::MovingAverage(_) => IndicatorKind::MovingAverage,
            IndicatorSpec::Momentum(_) => IndicatorKind::Momentum,
            IndicatorSpec::WeightedClose(_) => IndicatorKind::WeightedClose,
            IndicatorSpec::MedianPrice(_) => IndicatorKind::MedianPrice,
            IndicatorSpec::AveragePrice(_) => IndicatorKind::AveragePrice,
            IndicatorSpec::PercentChange(_) => IndicatorKind::PercentChange,
            IndicatorSpec::Correlation(_) => IndicatorKind::Correlation,
            IndicatorSpec::Ratio(_) => IndicatorKind::Ratio,
        }
    }

    /// Runs the transform. `secondary` is required for dual-series
    /// indicators and ignored otherwise.
    pub fn compute(
        &self,
        primary: &[Bar],
        secondary: Option<&[Bar]>,
    ) -> Result<Vec<DerivedPoint>, PlotlineError> {
        match self {
            IndicatorSpec::Sma(o) => sma::calculate_sma(primary, o),
            IndicatorSpec::Ema(o) => ema::calculate_ema(primary, o),
            IndicatorSpec::Wma(o) => wma::calculate_wma(primary, o),
            IndicatorSpec::MovingAverage(o) => moving_average::calculate_moving_average(primary, o),
            IndicatorSpec::Momentum(o) => momentum::calculate_momentum(primary, o),
            IndicatorSpec::WeightedClose(o) => weighted_close::calculate_weighted_close(primary, o),
            IndicatorSpec::MedianPrice(o) => median_price::calculate_median_price(primary, o),
            IndicatorSpec::AveragePrice(o) => average_price::calculate_average_price(primary, o),
            IndicatorSpec::PercentChange(o) => percent_change::calculate_percent_change(primary, o),
            IndicatorSpec::Correlation(o) => {
                correlation::calculate_correlation(primary, require_secondary(secondary)?, o)
            }
            IndicatorSpec::Ratio(o) => ratio::calculate_ratio(primary, require_secondary(secondary)?, o),
        }
    }

    /// Merges a partial update into the current options.
    pub fn merge(&mut self, patch: &OptionsPatch) {
        match self {
            IndicatorSpec::Sma(o)
            | IndicatorSpec::Ema(o)
            | IndicatorSpec::Wma(o)
            | IndicatorSpec::Momentum(o) => merge_window(o, patch),
            IndicatorSpec::MovingAverage(o) => {
                merge_window(&mut o.window, patch);
                if let Some(smoothing) = patch.smoothing {
                    o.smoothing = smoothing;
                }
            }
            IndicatorSpec::WeightedClose(o) => {
                o.weight = patch.weight.unwrap_or(o.weight);
                o.offset = patch.offset.unwrap_or(o.offset);
            }
            IndicatorSpec::MedianPrice(o)
            | IndicatorSpec::AveragePrice(o)
            | IndicatorSpec::PercentChange(o) => {
                o.offset = patch.offset.unwrap_or(o.offset);
            }
            IndicatorSpec::Correlation(o) => {
                o.primary_source = patch.source.or(o.primary_source);
                o.secondary_source = patch.secondary_source.or(o.secondary_source);
                o.length = patch.length.unwrap_or(o.length);
                o.allow_mismatched_dates = patch
                    .allow_mismatched_dates
                    .unwrap_or(o.allow_mismatched_dates);
            }
            IndicatorSpec::Ratio(o) => {
                o.primary_source = patch.source.or(o.primary_source);
                o.secondary_source = patch.secondary_source.or(o.secondary_source);
                o.allow_mismatched_dates = patch
                    .allow_mismatched_dates
                    .unwrap_or(o.allow_mismatched_dates);
            }
        }
    }
}

fn merge_window(options: &mut WindowOptions, patch: &OptionsPatch) {
    options.source = patch.source.or(options.source);
    options.length = patch.length.unwrap_or(options.length);
    options.offset = patch.offset.unwrap_or(options.offset);
}

fn require_secondary(secondary: Option<&[Bar]>) -> Result<&[Bar], PlotlineError> {
    secondary.ok_or_else(|| PlotlineError::configuration("secondary series required"))
}

pub(crate) fn require_length(length: usize) -> Result<usize, PlotlineError> {
    if length == 0 {
        Err(PlotlineError::configuration(
            "length must be a positive integer",
        ))
    } else {
        Ok(length)
    }
}

/// Shared driver for the rolling single-source transforms: validates,
/// resolves the source, runs `window` over the samples and applies the
/// offset.
pub(crate) fn windowed(
    bars: &[Bar],
    options: &WindowOptions,
    window: impl Fn(&[Option<f64>], usize) -> Vec<Option<f64>>,
) -> Result<Vec<DerivedPoint>, PlotlineError> {
    bar::validate_times(bars)?;
    let length = require_length(options.length)?;
    if bars.is_empty() {
        return Ok(Vec::new());
    }
    let source = SourceField::resolve(options.source, bars)?;
    let values = window(&bar::samples(bars, source), length);
    Ok(apply_offset(bar::to_points(bars, values), options.offset))
}

/// Shared driver for the per-bar price transforms.
pub(crate) fn per_bar(
    bars: &[Bar],
    offset: i64,
    value: impl Fn(&Bar) -> Option<f64>,
) -> Result<Vec<DerivedPoint>, PlotlineError> {
    bar::validate_times(bars)?;
    let points = bars
        .iter()
        .map(|b| DerivedPoint::new(b.time, value(b).filter(|v| v.is_finite())))
        .collect();
    Ok(apply_offset(points, offset))
}

impl fmt::Display for IndicatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorSpec::Sma(o) => write!(f, "SMA({})", o.length),
            IndicatorSpec::Ema(o) => write!(f, "EMA({})", o.length),
            IndicatorSpec::Wma(o) => write!(f, "WMA({})", o.length),
            IndicatorSpec::MovingAverage(o) => match o.smoothing {
                Some(s) => write!(f, "MA({},{}({}))", o.window.length, s.method, s.length),
                None => write!(f, "MA({})", o.window.length),
            },
            IndicatorSpec::Momentum(o) => write!(f, "MOM({})", o.length),
            IndicatorSpec::WeightedClose(o) => write!(f, "WCLOSE({})", o.weight),
            IndicatorSpec::MedianPrice(_) => write!(f, "MEDPRICE"),
            IndicatorSpec::AveragePrice(_) => write!(f, "AVGPRICE"),
            IndicatorSpec::PercentChange(_) => write!(f, "PCTCHANGE"),
            IndicatorSpec::Correlation(o) => write!(f, "CORREL({})", o.length),
            IndicatorSpec::Ratio(_) => write!(f, "RATIO"),
        }
    }
}
